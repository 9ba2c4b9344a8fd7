fn main() {
    uwb_eval::cli::run();
}
