fn main() -> std::process::ExitCode {
    statusdeck_lib::run()
}
