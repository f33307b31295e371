fn main() -> anyhow::Result<()> {
    mechsplit::run()
}
