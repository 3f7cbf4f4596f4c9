use anyhow::Result;

fn main() -> Result<()> {
    audio_tag_copy::cli::main()
}
