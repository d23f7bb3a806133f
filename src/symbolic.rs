#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// the 27 variable slots and the tables binding them to numbers
///
///# Example
/// ```
/// use FrenetSciThe::symbolic::symbolic_engine::Expr;
/// use FrenetSciThe::symbolic::variables::{bind, Variable};
/// let f = Expr::parse_expression("t^2 + 1").unwrap();
/// {
///     let _guard = bind(Variable::T, 3.0);
///     assert_eq!(f.evaluate().unwrap(), 10.0);
/// }
/// // the previous value (0) is back once the guard is dropped
/// assert_eq!(f.evaluate().unwrap(), 1.0);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod variables;
/// a module turns a String expression into a symbolic expression
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) turns a String expression into a symbolic expression
/// 2) differentiates and substitutes symbolic expressions
/// 3) evaluates a symbolic expression against a table of variable values
/// 4) turns a symbolic expression into a string expression for printing and control results
///# Example#
/// ```
/// use FrenetSciThe::symbolic::symbolic_engine::Expr;
/// use FrenetSciThe::symbolic::variables::{Variable, VariableTable};
/// let input = "sin(t)*t + sqrt(t)";
/// // here you've got symbolic expression
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// // differentiate with respect to t
/// let df_dt = parsed_expression.diff(Variable::T).unwrap();
/// println!("df_dt = {}", df_dt);
/// // reparametrize t = 2*r
/// let g = Expr::parse_expression("2*r").unwrap();
/// let in_r = parsed_expression.substitute_variable(Variable::T, &g);
/// let table = VariableTable::new().with(Variable::R, 0.5).with(Variable::T, 1.0);
/// let lhs = in_r.eval_with(&table).unwrap();
/// let rhs = parsed_expression.eval_with(&table).unwrap();
/// assert!((lhs - rhs).abs() < 1e-12);
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
/// error types of parsing, differentiation and evaluation
pub mod symbolic_errors;
///________________________________________________________________________________________________________________________________________________
///
/// three expressions treated as a vector: cross, dot, norm, derivative
/// Example#
/// ```
/// use FrenetSciThe::symbolic::symbolic_engine::Expr;
/// use FrenetSciThe::symbolic::symbolic_vectors::ExprVector3;
/// use FrenetSciThe::symbolic::variables::{Variable, VariableTable};
/// let helix = ExprVector3::new(
///     Expr::parse_expression("cos(t)").unwrap(),
///     Expr::parse_expression("sin(t)").unwrap(),
///     Expr::parse_expression("t").unwrap(),
/// );
/// let speed = helix.diff(Variable::T).unwrap().norm();
/// let table = VariableTable::new().with(Variable::T, 0.3);
/// assert!((speed.eval_with(&table).unwrap() - 2f64.sqrt()).abs() < 1e-12);
/// ```
pub mod symbolic_vectors;
