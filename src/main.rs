fn main() {
    if let Err(err) = revenue_forecast::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
