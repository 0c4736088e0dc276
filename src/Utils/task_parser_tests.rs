/////////////////////////////TESTS////////////////////////////////////////////////////
/*
tests:
pieces of the grammar
whole documents, mixed types, repeated sections
comments and blank lines
malformed documents
file-based parsing
*/

#[cfg(test)]
mod tests1 {
    use crate::Utils::task_parser::{
        DocumentError, Value, filter_comments, parse_document, parse_document_file, parse_key,
        parse_key_value_pair, parse_section, parse_title, parse_value, parse_value_list,
    };
    use std::io::Write;

    #[test]
    fn test_parse_title() {
        let (remaining, title) = parse_title("plot\n x_min: -5").unwrap();
        assert_eq!(title, "plot");
        assert_eq!(remaining, "x_min: -5");

        let (remaining, title) = parse_title("epsilon_delta epsilon: 0.1").unwrap();
        assert_eq!(title, "epsilon_delta");
        assert_eq!(remaining, "epsilon: 0.1");

        assert!(parse_title("1plot").is_err());
    }

    #[test]
    fn test_parse_key() {
        let (remaining, key) = parse_key("max_iterations: 10").unwrap();
        assert_eq!(key, "max_iterations");
        assert_eq!(remaining, ": 10");
    }

    #[test]
    fn test_parse_value() {
        let (remaining, value) = parse_value("x, y").unwrap();
        assert_eq!(value, Value::String("x".to_string()));
        assert_eq!(remaining, ", y");

        let (_, value) = parse_value("-10").unwrap();
        assert_eq!(value, Value::Integer(-10));

        let (_, value) = parse_value("1e-6").unwrap();
        assert_eq!(value, Value::Float(1e-6));

        let (_, value) = parse_value("arcsin").unwrap();
        assert_eq!(value, Value::String("arcsin".to_string()));

        // f64 parsing accepts the infinities
        let (_, value) = parse_value("-inf").unwrap();
        assert_eq!(value, Value::Float(f64::NEG_INFINITY));
    }

    #[test]
    fn test_parse_value_list() {
        let (remaining, values) = parse_value_list("-10, -5 ,0,  5\nnext").unwrap();
        assert_eq!(
            values,
            vec![
                Value::Integer(-10),
                Value::Integer(-5),
                Value::Integer(0),
                Value::Integer(5)
            ]
        );
        assert_eq!(remaining, "\nnext");
    }

    #[test]
    fn test_parse_key_value_pair() {
        let (_, (key, values)) = parse_key_value_pair("tolerance : 0.001").unwrap();
        assert_eq!(key, "tolerance");
        assert_eq!(values, vec![Value::Float(0.001)]);

        let (_, (key, values)) = parse_key_value_pair("variable:").unwrap();
        assert_eq!(key, "variable");
        assert!(values.is_empty());
    }

    #[test]
    fn test_parse_section() {
        let (remaining, (title, section)) =
            parse_section("plot\n  x_min: -5\n  x_max: 5\nlimit\n  point: 0").unwrap();
        assert_eq!(title, "plot");
        assert_eq!(section.len(), 2);
        assert_eq!(section["x_min"], vec![Value::Integer(-5)]);
        assert_eq!(remaining, "limit\n  point: 0");
    }

    #[test]
    fn test_filter_comments() {
        let text = "// header\nplot\n# note\n  x_min: -5\n% old\n; also\n\n  x_max: 5";
        assert_eq!(filter_comments(text), "plot\n  x_min: -5\n  x_max: 5");
    }

    #[test]
    fn test_parse_document() {
        let text = r#"
            // plotting window
            general
              variable: t
            plot
              x_min: -2.5
              x_max: 2.5
              samples: 200
            scan
              probes: -1, 0, 1
              tolerance: 1e-4
        "#;
        let document = parse_document(text).unwrap();
        assert_eq!(document.len(), 3);
        assert_eq!(
            document["general"]["variable"],
            vec![Value::String("t".to_string())]
        );
        assert_eq!(document["plot"]["x_min"][0].as_f64(), Some(-2.5));
        assert_eq!(document["plot"]["samples"][0].as_integer(), Some(200));
        assert_eq!(document["scan"]["probes"].len(), 3);
        assert_eq!(document["scan"]["tolerance"][0].as_f64(), Some(1e-4));
    }

    #[test]
    fn test_single_line_document() {
        let document = parse_document("general variable: x limit point: inf").unwrap();
        assert_eq!(document["general"]["variable"][0].to_string(), "x");
        assert_eq!(document["limit"]["point"][0], Value::Float(f64::INFINITY));
    }

    #[test]
    fn test_repeated_sections_merge() {
        let document = parse_document("plot\n x_min: -1\nplot\n x_max: 1\n x_min: -3").unwrap();
        assert_eq!(document["plot"]["x_min"], vec![Value::Integer(-3)]);
        assert_eq!(document["plot"]["x_max"], vec![Value::Integer(1)]);
    }

    #[test]
    fn test_empty_and_comment_only_documents() {
        assert!(parse_document("").unwrap().is_empty());
        assert!(parse_document("# nothing\n// here\n").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_document() {
        // a title without any key
        let result = parse_document("plot\n: 5");
        assert!(matches!(result, Err(DocumentError::Trailing(_))));
    }

    #[test]
    fn test_parse_document_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "epsilon_delta\n  epsilon: 0.05\n  max_iterations: 50").unwrap();
        let document = parse_document_file(file.path()).unwrap();
        assert_eq!(document["epsilon_delta"]["epsilon"][0].as_f64(), Some(0.05));
        assert_eq!(
            document["epsilon_delta"]["max_iterations"][0].as_integer(),
            Some(50)
        );

        let missing = parse_document_file(std::path::Path::new("/definitely/not/here.txt"));
        assert!(matches!(missing, Err(DocumentError::Io(_))));
    }
}
