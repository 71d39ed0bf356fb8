use arithfunc_rs::Compiler;

fn main() {
    pretty_env_logger::init();

    let rows = vec![
        vec![120.0, 3000.0],
        vec![80.0, 6000.0],
        vec![95.5],
        vec![101.0, 4500.0],
    ];

    let expression = "V0 * V1 / 1000 - sqrt(V1)";
    let compiled = Compiler::default()
        .compile(expression)
        .expect("Failed to compile");
    println!("{} needs {} variable(s)", compiled, compiled.variable_count());

    for (i, result) in compiled.evaluate_batch(&rows).into_iter().enumerate() {
        match result {
            Ok(value) => println!("Result {}: {}", i, value),
            Err(err) => println!("Result {}: error: {}", i, err),
        }
    }
}
