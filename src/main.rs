fn main() {
    openapi_date_codegen::init_tracing();
    let code = openapi_date_codegen::run_cli(std::env::args().collect());
    std::process::exit(code);
}
