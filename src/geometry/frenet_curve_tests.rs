use crate::geometry::curve_io::{
    CurveFileError, export_frenet, format_curve_definition, import_frenet,
    parse_curve_definition, save_frames_to_csv,
};
use crate::geometry::frenet_curve::{
    CurveError, CurveRole, Domain, FrenetCurve, Quantity,
};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::variables::Variable;
use std::f64::consts::PI;
//___________________________________TESTS____________________________________

mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    fn curve(components: [&str; 3], reparametrization: &str, start: f64, end: f64) -> FrenetCurve {
        FrenetCurve::from_strings(components, reparametrization, Domain::new(start, end).unwrap())
            .unwrap()
    }

    fn circle() -> FrenetCurve {
        curve(["cos(t)", "sin(t)", "0"], "r", 0.0, 2.0 * PI)
    }

    fn helix() -> FrenetCurve {
        curve(["cos(t)", "sin(t)", "t"], "r", 0.0, 4.0 * PI)
    }

    fn straight_line() -> FrenetCurve {
        curve(["t", "0", "0"], "r", 0.0, 1.0)
    }

    fn twisted_cubic() -> FrenetCurve {
        curve(["t", "t^2", "t^3"], "r", -1.0, 1.0)
    }

    #[test]
    fn test_circle_curvature_is_one() {
        let circle = circle();
        for r in circle.domain().linspace(17) {
            assert!(circle.is_curvature_defined(r));
            assert!(circle.is_curvature_radius_defined(r));
            assert_relative_eq!(circle.evaluate_curvature(r).unwrap(), 1.0, epsilon = 1e-9);
            assert_relative_eq!(
                circle.evaluate_curvature_radius(r).unwrap(),
                1.0,
                epsilon = 1e-9
            );
            assert_relative_eq!(circle.evaluate_torsion(r).unwrap(), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_circle_position_and_frame() {
        let circle = circle();
        let r = PI / 2.0;
        assert_relative_eq!(
            circle.evaluate(r).unwrap(),
            Vector3::new(0.0, 1.0, 0.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            circle.evaluate_tangent(r).unwrap(),
            Vector3::new(-1.0, 0.0, 0.0),
            epsilon = 1e-12
        );
        // normal points to the centre
        assert_relative_eq!(
            circle.evaluate_normal(r).unwrap(),
            Vector3::new(0.0, -1.0, 0.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            circle.evaluate_binormal(r).unwrap(),
            Vector3::new(0.0, 0.0, 1.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_helix_curvature_torsion_and_orthonormal_frame() {
        let helix = helix();
        for r in [0.0, 0.4, 1.7, 3.0, 10.0] {
            assert_relative_eq!(helix.evaluate_curvature(r).unwrap(), 0.5, epsilon = 1e-9);
            assert_relative_eq!(helix.evaluate_torsion(r).unwrap(), 0.5, epsilon = 1e-9);
            assert_relative_eq!(
                helix.evaluate_curvature_radius(r).unwrap(),
                2.0,
                epsilon = 1e-9
            );
            let t = helix.evaluate_tangent(r).unwrap();
            let n = helix.evaluate_normal(r).unwrap();
            let b = helix.evaluate_binormal(r).unwrap();
            assert_relative_eq!(t.norm(), 1.0, epsilon = 1e-9);
            assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-9);
            assert_relative_eq!(b.norm(), 1.0, epsilon = 1e-9);
            assert_relative_eq!(t.dot(&n), 0.0, epsilon = 1e-9);
            assert_relative_eq!(t.dot(&b), 0.0, epsilon = 1e-9);
            assert_relative_eq!(t.cross(&n), b, epsilon = 1e-9);
            assert_relative_eq!(n, Vector3::new(-r.cos(), -r.sin(), 0.0), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_straight_line_degeneracy() {
        let line = straight_line();
        for r in line.domain().linspace(5) {
            assert!(line.is_tangent_defined(r));
            assert!(line.is_curvature_defined(r));
            assert!(!line.is_binormal_defined(r));
            assert!(!line.is_normal_defined(r));
            assert!(!line.is_torsion_defined(r));
            assert!(!line.is_curvature_radius_defined(r));
            assert_relative_eq!(
                line.evaluate_tangent(r).unwrap(),
                Vector3::new(1.0, 0.0, 0.0)
            );
            assert_relative_eq!(line.evaluate_curvature(r).unwrap(), 0.0);
        }
        assert!(matches!(
            line.evaluate_binormal(0.5),
            Err(CurveError::Undefined {
                quantity: Quantity::Binormal,
                r
            }) if r == 0.5
        ));
        assert!(matches!(
            line.evaluate_curvature_radius(0.5),
            Err(CurveError::Undefined {
                quantity: Quantity::CurvatureRadius,
                ..
            })
        ));
        assert!(matches!(
            line.evaluate_torsion(0.5),
            Err(CurveError::Undefined {
                quantity: Quantity::Torsion,
                ..
            })
        ));
    }

    #[test]
    fn test_stationary_reparametrization() {
        let curve = curve(["t", "0", "0"], "r^2", 0.0, 1.0);
        assert!(!curve.is_tangent_defined(0.0));
        assert!(!curve.is_curvature_defined(0.0));
        assert!(curve.is_tangent_defined(0.5));
        assert!(matches!(
            curve.evaluate_tangent(0.0),
            Err(CurveError::Undefined {
                quantity: Quantity::Tangent,
                ..
            })
        ));
        assert_relative_eq!(
            curve.evaluate_tangent(0.5).unwrap(),
            Vector3::new(1.0, 0.0, 0.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            curve.evaluate(0.5).unwrap(),
            Vector3::new(0.25, 0.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_reparametrization_keeps_geometry() {
        let fast = curve(["cos(t)", "sin(t)", "0"], "2*r", 0.0, PI);
        let slow = circle();
        for r in [0.1, 0.8, 2.5] {
            assert_relative_eq!(
                fast.evaluate(r).unwrap(),
                slow.evaluate(2.0 * r).unwrap(),
                epsilon = 1e-12
            );
            assert_relative_eq!(fast.evaluate_curvature(r).unwrap(), 1.0, epsilon = 1e-9);
            assert_relative_eq!(
                fast.speed()
                    .eval_with(
                        &crate::symbolic::variables::VariableTable::new()
                            .with(Variable::R, r)
                    )
                    .unwrap(),
                2.0,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_validation_rejects_foreign_variables() {
        let domain = Domain::new(0.0, 1.0).unwrap();
        let result = FrenetCurve::from_strings(["t", "r", "0"], "r", domain);
        assert!(matches!(
            result,
            Err(CurveError::Validation {
                variable: Variable::R,
                role: CurveRole::Y
            })
        ));
        let message = result.unwrap_err().to_string();
        assert!(message.contains("`r`"), "{message}");

        let result = FrenetCurve::from_strings(["t", "t", "t"], "t + r", domain);
        assert!(matches!(
            result,
            Err(CurveError::Validation {
                variable: Variable::T,
                role: CurveRole::Reparametrization
            })
        ));
        let result = FrenetCurve::from_strings(["z1", "t", "t"], "r", domain);
        assert!(matches!(
            result,
            Err(CurveError::Validation {
                variable: Variable::Z1,
                role: CurveRole::X
            })
        ));
        // constant formulas are fine
        assert!(FrenetCurve::from_strings(["1", "2", "3"], "5", domain).is_ok());
    }

    #[test]
    fn test_parse_error_aborts_build() {
        let domain = Domain::new(0.0, 1.0).unwrap();
        let result = FrenetCurve::from_strings(["t", "tan(t)", "0"], "r", domain);
        assert!(matches!(result, Err(CurveError::Parse(_))));
    }

    #[test]
    fn test_variable_exponent_is_reported() {
        let domain = Domain::new(0.0, 1.0).unwrap();
        let result = FrenetCurve::from_strings(["2^t", "0", "0"], "r", domain);
        assert!(matches!(result, Err(CurveError::Derivative(_))));
    }

    #[test]
    fn test_idempotent_rebuild() {
        let first = helix();
        let second = helix();
        assert_eq!(first, second);
        let a = first.sample(25).unwrap();
        let b = second.sample(25).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_domain() {
        let domain = Domain::new(0.0, 1.0).unwrap();
        assert_eq!(domain.linspace(5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(domain.linspace(1), vec![0.0]);
        assert!(domain.linspace(0).is_empty());
        assert!(domain.contains(0.3));
        assert!(!domain.contains(1.1));
        let reversed = Domain::try_from((1.0, -1.0)).unwrap();
        assert!(reversed.contains(0.0));
        assert_eq!(reversed.linspace(3), vec![1.0, 0.0, -1.0]);
        assert!(matches!(
            Domain::new(0.0, f64::INFINITY),
            Err(CurveError::InvalidDomain { .. })
        ));
        assert!(Domain::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_epsilon() {
        assert!(matches!(
            circle().with_epsilon(0.0),
            Err(CurveError::InvalidEpsilon { .. })
        ));
        assert!(circle().with_epsilon(f64::NAN).is_err());
        // |C'| = 1 on the unit circle
        let coarse = circle().with_epsilon(1.5).unwrap();
        assert_eq!(coarse.epsilon(), 1.5);
        assert!(!coarse.is_tangent_defined(0.3));
        assert!(circle().is_tangent_defined(0.3));
    }

    #[test]
    fn test_frame_and_sampling() {
        let frames = straight_line().sample(3).unwrap();
        assert_eq!(frames.len(), 3);
        let last = &frames[2];
        assert_eq!(last.r, 1.0);
        assert_relative_eq!(last.position, Vector3::new(1.0, 0.0, 0.0));
        assert!(last.tangent.is_some());
        assert!(last.normal.is_none());
        assert!(last.binormal.is_none());
        assert_eq!(last.curvature, Some(0.0));
        assert!(last.curvature_radius.is_none());
        assert!(last.torsion.is_none());

        let frame = helix().frame_at(1.0).unwrap();
        assert_relative_eq!(frame.torsion.unwrap(), 0.5, epsilon = 1e-9);
        assert!(frame.normal.is_some());
    }

    #[test]
    fn test_twisted_cubic_curvature_and_torsion() {
        let cubic = twisted_cubic();
        // C' = (1, 0, 0), C'' = (0, 2, 0), C''' = (0, 0, 6) at the origin
        assert!(cubic.is_torsion_defined(0.0));
        assert_relative_eq!(cubic.evaluate_curvature(0.0).unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(cubic.evaluate_torsion(0.0).unwrap(), 3.0, epsilon = 1e-12);
        assert_relative_eq!(cubic.evaluate_curvature_radius(0.0).unwrap(), 0.5, epsilon = 1e-12);
        // |C' x C''| = 2 sqrt(w), |C'|^2 = 1 + 4r^2 + 9r^4
        for r in [-1.0_f64, -0.5, 0.0, 0.3, 1.0] {
            let w = 9.0 * r.powi(4) + 9.0 * r * r + 1.0;
            let speed_sq = 1.0 + 4.0 * r * r + 9.0 * r.powi(4);
            assert_relative_eq!(
                cubic.evaluate_curvature(r).unwrap(),
                2.0 * w.sqrt() / speed_sq.powf(1.5),
                epsilon = 1e-9
            );
            assert_relative_eq!(cubic.evaluate_torsion(r).unwrap(), 3.0 / w, epsilon = 1e-9);
            assert_relative_eq!(
                cubic.evaluate(r).unwrap(),
                Vector3::new(r, r * r, r * r * r),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_polynomial_sampling_through_zero() {
        let frames = twisted_cubic().sample(3).unwrap();
        assert_eq!(frames.len(), 3);
        let origin = &frames[1];
        assert_eq!(origin.r, 0.0);
        assert_relative_eq!(origin.position, Vector3::zeros());
        assert_relative_eq!(origin.tangent.unwrap(), Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(origin.normal.unwrap(), Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(origin.binormal.unwrap(), Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
        assert_relative_eq!(origin.curvature.unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(origin.torsion.unwrap(), 3.0, epsilon = 1e-12);

        // plane parabola: third derivative vanishes, torsion is zero
        let parabola = curve(["t", "t^2", "0"], "r", -1.0, 1.0);
        let frame = parabola.frame_at(0.0).unwrap();
        assert_relative_eq!(frame.curvature.unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(frame.torsion.unwrap(), 0.0, epsilon = 1e-12);
        assert_eq!(parabola.sample(5).unwrap().len(), 5);

        // squared parameter puts the zero base inside the chain rule too
        let squared = curve(["t", "t^2", "t^3"], "r^2", -1.0, 1.0);
        assert!(!squared.is_tangent_defined(0.0));
        assert_eq!(squared.sample(3).unwrap()[1].tangent, None);
    }

    #[test]
    fn test_frame_outside_domain_is_still_evaluated() {
        let cubic = twisted_cubic();
        assert!(!cubic.domain().contains(2.0));
        let frame = cubic.frame_at(2.0).unwrap();
        assert_relative_eq!(frame.position, Vector3::new(2.0, 4.0, 8.0), epsilon = 1e-12);
        assert_relative_eq!(frame.torsion.unwrap(), 3.0 / 181.0, epsilon = 1e-9);
    }

    #[test]
    fn test_concurrent_evaluation() {
        let helix = helix();
        let expected = helix.evaluate_curvature(0.3).unwrap();
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| helix.evaluate_curvature(0.3).unwrap()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn test_accessors() {
        let curve = curve(["t^2", "t", "0"], "r", 0.0, 1.0);
        assert_eq!(curve.components().x(), &Expr::parse_expression("t^2").unwrap());
        assert_eq!(curve.reparametrization(), &Expr::Var(Variable::R));
        assert!(!curve.reparametrized().contains_variable(Variable::T));
        assert!(curve.first_derivative().contains_variable(Variable::R));
        assert!(curve.node_count_table().contains("torsion"));
        assert!(curve.curvature().node_count() > curve.speed().node_count());
    }

    //___________________________________FILES____________________________________

    const HELIX_FILE: &str = "# helix around the z axis\n\
                              \n\
                              cos(t)\n\
                              # second component\n\
                              sin(t)\n\
                              \n\
                              t\n\
                              0, 12.566370614359172\n\
                              this line is ignored\n";

    #[test]
    fn test_parse_curve_definition() {
        let definition = parse_curve_definition(HELIX_FILE).unwrap();
        assert_eq!(definition.x, "cos(t)");
        assert_eq!(definition.y, "sin(t)");
        assert_eq!(definition.z, "t");
        assert_eq!(definition.domain, Domain::new(0.0, 12.566370614359172).unwrap());

        let without_comma = parse_curve_definition("t\n0\n0\n-1 2.5\n").unwrap();
        assert_eq!(without_comma.domain, Domain::new(-1.0, 2.5).unwrap());
    }

    #[test]
    fn test_curve_definition_format_errors() {
        assert!(matches!(
            parse_curve_definition("# only x and y\nt\nt\n"),
            Err(CurveFileError::MissingLine { expected: "z(t)" })
        ));
        assert!(matches!(
            parse_curve_definition("t\nt\nt\n"),
            Err(CurveFileError::MissingLine { expected: "domain" })
        ));
        assert!(matches!(
            parse_curve_definition("t\nt\nt\n\n0, abc\n"),
            Err(CurveFileError::Format { line: 5, .. })
        ));
        assert!(matches!(
            parse_curve_definition("t\nt\nt\n0\n"),
            Err(CurveFileError::Format { line: 4, .. })
        ));
    }

    #[test]
    fn test_import_frenet() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("helix.txt");
        let mut file = File::create(&file_path).unwrap();
        write!(file, "{}", HELIX_FILE).unwrap();

        let helix = import_frenet(&file_path).unwrap();
        assert_eq!(helix.reparametrization(), &Expr::Var(Variable::R));
        assert_relative_eq!(helix.evaluate_torsion(2.0).unwrap(), 0.5, epsilon = 1e-9);

        let missing = import_frenet(dir.path().join("missing.txt"));
        assert!(matches!(missing, Err(CurveFileError::Io(_))));

        let foreign = dir.path().join("foreign.txt");
        fs::write(&foreign, "x\nt\nt\n0 1\n").unwrap();
        assert!(matches!(
            import_frenet(&foreign),
            Err(CurveFileError::Curve(CurveError::Validation {
                variable: Variable::X,
                ..
            }))
        ));
    }

    #[test]
    fn test_export_then_import() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("exported.txt");
        let original = helix();
        export_frenet(&original, &file_path).unwrap();
        let imported = import_frenet(&file_path).unwrap();
        assert_eq!(imported.components(), original.components());
        assert_eq!(imported.domain(), original.domain());
        for r in [0.0, 1.0, 5.5] {
            assert_eq!(imported.evaluate(r).unwrap(), original.evaluate(r).unwrap());
        }
    }

    #[test]
    fn test_export_records_reparametrization() {
        let fast = curve(["cos(t)", "sin(t)", "0"], "2*r", 0.0, 1.0);
        let text = format_curve_definition(&fast);
        assert!(text.contains("# reparametrized with t = (2 * r)"), "{text}");
        assert!(!format_curve_definition(&circle()).contains("reparametrized"));
    }

    #[test]
    fn test_save_frames_to_csv() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("frames.csv");
        let frames = straight_line().sample(3).unwrap();
        save_frames_to_csv(&frames, &file_path).unwrap();

        let contents = fs::read_to_string(&file_path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("r,x,y,z,tx,ty,tz"));
        let cells: Vec<&str> = lines[2].split(',').collect();
        assert_eq!(cells.len(), 16);
        assert_eq!(cells[0], "0.5");
        assert_eq!(cells[1], "0.5");
        assert_eq!(cells[4], "1");
        // normal and binormal undefined
        assert!(cells[7..13].iter().all(|cell| cell.is_empty()));
        assert_eq!(cells[13], "0");
        assert!(cells[14].is_empty());
        assert!(cells[15].is_empty());
    }
}
