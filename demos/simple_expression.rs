use arithfunc_rs::Compiler;
use log::debug;

fn main() {
    pretty_env_logger::init();

    let compiler = Compiler::default();
    let expression = "abs(-5 - V0) / V0 + V1^(1/2)";

    let compiled = match compiler.compile(expression) {
        Ok(compiled) => compiled,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };
    debug!("compiled: {:?}", compiled.root());

    match compiled.evaluate(&[1.0, 4.0]) {
        // 8
        Ok(result) => println!("{} = {}", compiled, result),
        Err(err) => eprintln!("Error: {}", err),
    }
}
