fn main() {
    lockgraph::cli::run();
}
