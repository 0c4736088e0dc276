//___________________________________TESTS____________________________________

#[cfg(test)]
mod tests {
    use crate::symbolic::parse_expr::parse_expression_func;
    use crate::symbolic::symbolic_engine::{Expr, Func};
    use approx::assert_relative_eq;
    use std::collections::HashMap;
    use std::f64::consts::{E, PI};
    use strum::IntoEnumIterator;

    fn parse(input: &str) -> Expr {
        parse_expression_func(input).unwrap()
    }

    fn simplified(input: &str) -> String {
        parse(input).simplify().to_string()
    }

    fn derivative(input: &str) -> Expr {
        parse(input).diff("x").unwrap().simplify()
    }

    #[test]
    fn test_operator_overloads() {
        let x = Expr::var("x");
        let expr = x.clone() * Expr::Const(2.0) + -x;
        assert_eq!(
            expr,
            Expr::Add(
                Box::new(Expr::Mul(
                    Box::new(Expr::Var("x".to_string())),
                    Box::new(Expr::Const(2.0))
                )),
                Box::new(Expr::Neg(Box::new(Expr::Var("x".to_string()))))
            )
        );
    }

    //___________________________________PRINTING____________________________________

    #[test]
    fn test_canonical_and_display_power() {
        let expr = parse("(x+1)^(y+1)");
        assert_eq!(expr.to_string(), "pow(x+1,y+1)");
        assert_eq!(expr.to_display_string(), "(x+1)^(y+1)");
        assert_eq!(parse("pow(x,2)").to_display_string(), "x^2");
        assert_eq!(parse("x^-1").to_display_string(), "x^(-1)");
    }

    #[test]
    fn test_negation_printing() {
        assert_eq!(parse("-x^2").to_string(), "-pow(x,2)");
        assert_eq!(parse("-x^2").to_display_string(), "-x^2");
        assert_eq!(parse("2*-x").to_string(), "2*(-x)");
        assert_eq!(parse("-(x+1)").to_string(), "-(x+1)");
    }

    #[test]
    fn test_minimal_brackets() {
        assert_eq!(parse("a-(b-c)").to_string(), "a-(b-c)");
        assert_eq!(parse("a-b-c").to_string(), "a-b-c");
        assert_eq!(parse("a/(b*c)").to_string(), "a/(b*c)");
        assert_eq!(parse("(a*b)/c").to_string(), "a*b/c");
        assert_eq!(parse("((x))").to_string(), "x");
    }

    #[test]
    fn test_function_names_in_both_notations() {
        let expr = parse("log(x)+ln(x)+arcsin(x)");
        assert_eq!(expr.to_string(), "log10(x)+ln(x)+asin(x)");
        assert_eq!(expr.to_display_string(), "log(x)+ln(x)+arcsin(x)");
    }

    #[test]
    fn test_canonical_print_is_a_fixed_point() {
        for input in [
            "x^2+3*x-1",
            "sin(x)/x",
            "(x+1)^(y+1)",
            "-x^2/(1-x)",
            "2^-x",
            "log(x^2)+arctan(1/x)",
            "1e-7*x",
        ] {
            let once = parse(input).to_string();
            let twice = parse(&once).to_string();
            assert_eq!(once, twice, "input {}", input);
        }
    }

    #[test]
    fn test_every_function_round_trips_by_name() {
        for func in Func::iter() {
            let canonical = format!("{}(x)", func.canonical_name());
            let display = format!("{}(x)", func.display_name());
            assert_eq!(parse(&canonical), Expr::Call(func, Box::new(Expr::var("x"))));
            assert_eq!(parse(&display), parse(&canonical));
            assert_eq!(parse(&canonical).to_display_string(), display);
        }
    }

    //___________________________________TREE QUERIES____________________________________

    #[test]
    fn test_variables_exclude_named_constants() {
        let expr = parse("x*pi+e^y");
        assert_eq!(expr.all_arguments_are_variables(), vec!["x", "y"]);
        assert!(expr.contains_variable("y"));
        assert!(!expr.contains_variable("z"));
    }

    #[test]
    fn test_denominators_in_preorder() {
        let expr = parse("1/x + 1/(x-1)");
        let found: Vec<String> = expr.denominators().iter().map(|d| d.to_string()).collect();
        assert_eq!(found, vec!["x", "x-1"]);
        let nested = parse("1/(1/x)");
        let found: Vec<String> = nested.denominators().iter().map(|d| d.to_string()).collect();
        assert_eq!(found, vec!["1/x", "x"]);
    }

    #[test]
    fn test_logarithm_arguments() {
        let expr = parse("ln(x)+log(x-2)*sin(x)");
        let found: Vec<String> = expr
            .logarithm_arguments()
            .iter()
            .map(|d| d.to_string())
            .collect();
        assert_eq!(found, vec!["x", "x-2"]);
        assert!(parse("sin(x)").logarithm_arguments().is_empty());
    }

    //___________________________________EVALUATION____________________________________

    #[test]
    fn test_eval_named_constants() {
        let empty = HashMap::new();
        assert_relative_eq!(parse("e").eval_expression(&empty).unwrap(), E);
        assert_relative_eq!(parse("cos(pi)").eval_expression(&empty).unwrap(), -1.0);
        // a binding shadows the constant
        assert_eq!(parse("e").eval_at("e", 2.0).unwrap(), 2.0);
    }

    #[test]
    fn test_eval_elementary_functions() {
        assert_eq!(parse("sign(x)").eval_at("x", 0.0).unwrap(), 0.0);
        assert_eq!(parse("sign(x)").eval_at("x", -3.0).unwrap(), -1.0);
        assert_eq!(parse("factorial(x)").eval_at("x", 5.0).unwrap(), 120.0);
        assert_relative_eq!(parse("gamma(x)").eval_at("x", 0.5).unwrap(), PI.sqrt(), epsilon = 1e-12);
        assert_eq!(parse("sec(x)").eval_at("x", 0.0).unwrap(), 1.0);
        assert_eq!(parse("log2(x)").eval_at("x", 8.0).unwrap(), 3.0);
        assert_relative_eq!(parse("log(x)").eval_at("x", 100.0).unwrap(), 2.0);
        assert_relative_eq!(parse("ln(x)").eval_at("x", E).unwrap(), 1.0);
        assert_eq!(parse("abs(x)+floor(x)+ceil(x)").eval_at("x", -1.5).unwrap(), -1.5);
    }

    #[test]
    fn test_eval_ieee_semantics() {
        assert_eq!(parse("1/x").eval_at("x", 0.0).unwrap(), f64::INFINITY);
        assert_eq!(parse("-1/x").eval_at("x", 0.0).unwrap(), f64::NEG_INFINITY);
        assert!(parse("sqrt(x)").eval_at("x", -1.0).unwrap().is_nan());
        assert!(parse("ln(x)").eval_at("x", -1.0).unwrap().is_nan());
        assert!(parse("x+y").eval_at("x", 1.0).is_err());
    }

    #[test]
    fn test_lambdify1D() {
        let f = parse("x^2+pi").lambdify1D("x").unwrap();
        assert_relative_eq!(f(2.0), 4.0 + PI);
        assert!(parse("x+y").lambdify1D("x").is_err());
    }

    //___________________________________DIFFERENTIATION____________________________________

    #[test]
    fn test_power_rule() {
        assert_eq!(parse("x^2").diff("x").unwrap().to_string(), "2*pow(x,2-1)*1");
        assert_eq!(derivative("x^2").to_string(), "2*x");
        assert_eq!(derivative("x^2").to_display_string(), "2*x");
        assert_eq!(derivative("x^3").to_display_string(), "3*x^2");
    }

    #[test]
    fn test_simple_derivatives() {
        assert_eq!(derivative("5").to_string(), "0");
        assert_eq!(derivative("sin(x)").to_string(), "cos(x)");
        assert_eq!(derivative("cos(x)").to_string(), "-sin(x)");
        assert_eq!(derivative("ln(x)").to_string(), "1/x");
        assert_eq!(derivative("exp(2*x)").to_string(), "2*exp(2*x)");
        assert_eq!(parse("x*y").diff("x").unwrap().simplify().to_string(), "y");
    }

    #[test]
    fn test_piecewise_constant_derivatives() {
        for input in ["floor(x)", "ceil(x)", "round(x)", "sign(x)"] {
            assert_eq!(derivative(input), Expr::Const(0.0), "input {}", input);
        }
        assert_eq!(derivative("abs(x)").to_string(), "sign(x)");
    }

    #[test]
    fn test_gamma_has_no_elementary_derivative() {
        assert!(parse("gamma(x)").diff("x").is_err());
        assert!(parse("x+factorial(x)").diff("x").is_err());
        // unsupported regardless of the variable
        assert!(parse("gamma(x)").diff("y").is_err());
    }

    #[test]
    fn test_derivatives_match_central_differences() {
        let cases = [
            ("sin(x)*exp(x)", 1.0, 3.0),
            ("ln(x)/x", 1.0, 3.0),
            ("x^x", 1.0, 3.0),
            ("2^x", 1.0, 3.0),
            ("atan(x)+sqrt(x)", 1.0, 3.0),
            ("log10(x)+log2(x)", 1.0, 3.0),
            ("abs(x)*x", 1.0, 3.0),
            ("tan(x)+sec(x)", 0.1, 0.9),
            ("csc(x)+cot(x)", 0.1, 0.9),
            ("asin(x)+acos(x/2)", 0.1, 0.9),
            ("sinh(x)*cosh(x)+tanh(x)", 0.5, 2.0),
            ("sech(x)+csch(x)+coth(x)", 0.5, 2.0),
            ("exp(-x^2)/(1+x)", 0.5, 2.0),
        ];
        for (input, start, end) in cases {
            let (norm, ok) = parse(input).compare_num1D("x", start, end, 100, 1e-5).unwrap();
            assert!(ok, "{}: norm {}", input, norm);
        }
    }

    //___________________________________SIMPLIFICATION____________________________________

    #[test]
    fn test_identities() {
        assert_eq!(simplified("x+0"), "x");
        assert_eq!(simplified("0+x"), "x");
        assert_eq!(simplified("x*1"), "x");
        assert_eq!(simplified("0*x"), "0");
        assert_eq!(simplified("x-x"), "0");
        assert_eq!(simplified("x/x"), "1");
        assert_eq!(simplified("x*x"), "pow(x,2)");
    }

    #[test]
    fn test_power_identities() {
        assert_eq!(simplified("x^1"), "x");
        assert_eq!(simplified("x^0"), "1");
        assert_eq!(simplified("1^x"), "1");
        assert_eq!(simplified("(x^2)^3"), "pow(x,6)");
    }

    #[test]
    fn test_constant_folding() {
        assert_eq!(simplified("2+3*4"), "14");
        assert_eq!(simplified("2*(3*x)"), "6*x");
        assert_eq!(simplified("x*3"), "3*x");
        assert_eq!(simplified("sqrt(4)"), "2");
        assert_eq!(simplified("sin(1)"), "sin(1)");
        assert_eq!(simplified("ln(e)"), "1");
        // no folding into infinity
        assert_eq!(simplified("1/0"), "1/0");
    }

    #[test]
    fn test_sign_folding() {
        assert_eq!(simplified("-(-x)"), "x");
        assert_eq!(simplified("x+-(y)"), "x-y");
        assert_eq!(simplified("x-(-y)"), "x+y");
        assert_eq!(simplified("-(2*x)"), "-2*x");
        assert_eq!(simplified("x+-3"), "x-3");
    }
}
