#![allow(non_snake_case)]
use std::env;
use std::f64::consts::PI;

use FrenetSciThe::Utils::config::FrenetConfig;
use FrenetSciThe::Utils::logger::init_logger;
use FrenetSciThe::geometry::curve_io::{export_frenet, import_frenet, save_frames_to_csv};
use FrenetSciThe::geometry::frenet_curve::{Domain, FrenetCurve};
use FrenetSciThe::symbolic::symbolic_engine::Expr;
use FrenetSciThe::symbolic::symbolic_vectors::ExprVector3;
use FrenetSciThe::symbolic::variables::{Variable, VariableTable, bind};

// usage: FrenetSciThe [example] [config.toml] [curve.txt]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let example: usize = match args.get(1) {
        Some(arg) => arg.parse()?,
        None => 2,
    };
    let config = match args.get(2) {
        Some(path) => FrenetConfig::from_file(path)?,
        None => FrenetConfig::default(),
    };
    init_logger(config.log_level, config.log_to_file)?;

    match example {
        0 => {
            // SYMBOLIC EXPRESSIONS
            // parse expression from string to symbolic expression
            let input = "t^3 + sin(t)*sqrt(t)";
            let f = Expr::parse_expression(input)?;
            println!(" parsed_expression {}", f);
            // differentiate with respect to t
            let df_dt = f.diff(Variable::T)?;
            println!("df_dt = {}", df_dt);
            let d3f = f.n_th_derivative(Variable::T, 3)?;
            println!("d3f/dt3 has {} nodes", d3f.node_count());
            // evaluate against an explicit table ...
            let table = VariableTable::new().with(Variable::T, 2.0);
            println!("f(2) = {}, f'(2) = {}", f.eval_with(&table)?, df_dt.eval_with(&table)?);
            // ... or against the thread's table
            let _t = bind(Variable::T, 1.0);
            println!("f(1) = {}", f.evaluate()?);
        }
        1 => {
            // REPARAMETRIZATION AND VECTORS
            let parabola = ExprVector3::new(
                Expr::parse_expression("t")?,
                Expr::parse_expression("t^2")?,
                Expr::Const(0.0),
            );
            let g = Expr::parse_expression("r^2")?;
            let in_r = parabola.substitute(Variable::T, &g);
            let velocity = in_r.diff(Variable::R)?;
            println!("C(r) = {}", in_r);
            println!("C'(r) = {}", velocity);
            let table = VariableTable::new().with(Variable::R, 0.5);
            println!(
                "at r = 0.5: C = {:?}, |C'| = {}",
                in_r.eval_with(&table)?,
                velocity.norm().eval_with(&table)?
            );
        }
        2 => {
            // FRENET FRAME OF A HELIX
            let helix = FrenetCurve::new(
                [
                    Expr::parse_expression("cos(t)")?,
                    Expr::parse_expression("sin(t)")?,
                    Expr::parse_expression("t/4")?,
                ],
                config.reparametrization.clone(),
                Domain::new(0.0, 4.0 * PI)?,
            )?
            .with_epsilon(config.epsilon)?;
            for r in helix.domain().linspace(5) {
                let frame = helix.frame_at(r)?;
                println!(
                    "r = {:.3}: position {:?}, curvature {:?}, torsion {:?}",
                    r, frame.position, frame.curvature, frame.torsion
                );
            }
            let frames = helix.sample(config.samples)?;
            save_frames_to_csv(&frames, "helix_frames.csv")?;
            export_frenet(&helix, "helix.txt")?;
        }
        3 => {
            // DEGENERATE POINTS
            let line = FrenetCurve::from_strings(["t", "2*t", "0"], "r^3", Domain::new(-1.0, 1.0)?)?;
            for r in [-1.0, 0.0, 1.0] {
                println!(
                    "r = {}: tangent defined {}, binormal defined {}",
                    r,
                    line.is_tangent_defined(r),
                    line.is_binormal_defined(r)
                );
                match line.evaluate_tangent(r) {
                    Ok(tangent) => println!("  tangent {:?}", tangent),
                    Err(e) => println!("  {}", e),
                }
            }
        }
        4 => {
            // CURVE FROM A FILE
            let path = args.get(3).map(String::as_str).unwrap_or("helix.txt");
            let curve = import_frenet(path)?.with_epsilon(config.epsilon)?;
            println!("{}", curve.node_count_table());
            let frames = curve.sample(config.samples)?;
            save_frames_to_csv(&frames, "imported_frames.csv")?;
        }
        _ => {
            println!("example must be 0..=4");
        }
    }
    Ok(())
}
