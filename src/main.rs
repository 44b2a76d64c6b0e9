fn main() -> Result<(), Box<dyn std::error::Error>> {
    chatbuddy::cli::main()
}
