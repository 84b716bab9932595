/////////////////////////////TESTS////////////////////////////////////////////////////
/*
tests:
section parsers one by one
whole document
variable mismatch
invalid range
corrupted sections
file-based loading
*/

#[cfg(test)]
mod tests1 {
    use crate::Utils::task_parser::{
        DiffTask, parse_function, parse_range, parse_tangent, parse_taylor,
    };
    use crate::symbolic::symbolic_errors::TaskError;
    use std::io::Write;

    const TASK: &str = "$f(x) = \\sin x \\cdot x^2$\n\
                        Taylor series at 0 to $x^5$\n\
                        Tangent at $x = 1.5$\n\
                        Plot in range [-2, 2]\n";

    #[test]
    fn test_parse_function() {
        let (remaining, (var, function)) = parse_function("$f(x) = x^2 + 1$ rest").unwrap();
        assert_eq!(var, "x");
        assert_eq!(function, "x^2 + 1");
        assert_eq!(remaining, " rest");

        let (_, (var, _)) = parse_function("  $f( t ) =\\ln t$").unwrap();
        assert_eq!(var, "t");
    }

    #[test]
    fn test_parse_taylor() {
        let (_, (center, var, order)) = parse_taylor("Taylor series at -1.5 to $x^4$").unwrap();
        assert_eq!(center, -1.5);
        assert_eq!(var, "x");
        assert_eq!(order, 4);
        assert!(parse_taylor("Taylor series at zero to $x^4$").is_err());
    }

    #[test]
    fn test_parse_tangent() {
        let (_, (var, point)) = parse_tangent("Tangent at $y=2$").unwrap();
        assert_eq!(var, "y");
        assert_eq!(point, 2.0);
    }

    #[test]
    fn test_parse_range() {
        let (remaining, (start, end)) = parse_range("Plot in range [ -3.5 ,4 ]").unwrap();
        assert_eq!((start, end), (-3.5, 4.0));
        assert_eq!(remaining, "");
    }

    #[test]
    fn test_parse_document() {
        let task = DiffTask::parse(TASK).unwrap();
        assert_eq!(
            task,
            DiffTask {
                var: "x".to_string(),
                function: "\\sin x \\cdot x^2".to_string(),
                taylor_at: 0.0,
                taylor_order: 5,
                tangent_at: 1.5,
                range: (-2.0, 2.0),
            }
        );
    }

    #[test]
    fn test_variable_mismatch() {
        let text = TASK.replace("$x^5$", "$y^5$");
        match DiffTask::parse(&text) {
            Err(TaskError::VariableMismatch {
                section, found, ..
            }) => {
                assert_eq!(section, "Taylor series");
                assert_eq!(found, "y");
            }
            other => panic!("unexpected result {:?}", other),
        }
        let text = TASK.replace("$x = 1.5$", "$t = 1.5$");
        assert!(matches!(
            DiffTask::parse(&text),
            Err(TaskError::VariableMismatch { section: "tangent", .. })
        ));
    }

    #[test]
    fn test_invalid_range() {
        let text = TASK.replace("[-2, 2]", "[2, -2]");
        assert!(matches!(
            DiffTask::parse(&text),
            Err(TaskError::InvalidRange { .. })
        ));
        let text = TASK.replace("[-2, 2]", "[1, 1]");
        assert!(matches!(
            DiffTask::parse(&text),
            Err(TaskError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_corrupted_sections() {
        let text = TASK.replace("Tangent at", "Tangent in");
        assert!(matches!(
            DiffTask::parse(&text),
            Err(TaskError::Format { section: "tangent", .. })
        ));
        let text = TASK.replace("$f(x)", "f(x)");
        assert!(matches!(
            DiffTask::parse(&text),
            Err(TaskError::Format { section: "function", .. })
        ));
        let text = format!("{}extra", TASK);
        assert!(matches!(
            DiffTask::parse(&text),
            Err(TaskError::Format { section: "end of file", .. })
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TASK.as_bytes()).unwrap();
        let task = DiffTask::from_file(file.path()).unwrap();
        assert_eq!(task.taylor_order, 5);

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            DiffTask::from_file(&missing),
            Err(TaskError::Io(_))
        ));
    }

    #[test]
    fn test_loaded_task_solves() {
        let report = DiffTask::parse(TASK).unwrap().solve().unwrap();
        assert_eq!(report.range, (-2.0, 2.0));
        assert!(report.plot_function.contains("sin(x)"));
    }
}
