fn main() {
    if let Err(err) = count_mock::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
