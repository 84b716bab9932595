//! Runs a [`DiffTask`] through the symbolic pipeline and collects the rendered results.
use crate::Utils::task_parser::DiffTask;
use crate::symbolic::symbolic_engine::ExprTree;
use crate::symbolic::symbolic_errors::SymbolicError;
use log::info;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct TaskReport {
    pub var: String,
    pub function: String,
    pub derivative: String,
    pub taylor: String,
    pub tangent: String,
    pub plot_function: String,
    pub plot_taylor: String,
    pub plot_tangent: String,
    pub range: (f64, f64),
}

impl DiffTask {
    pub fn solve(&self) -> Result<TaskReport, SymbolicError> {
        let mut function = ExprTree::parse_expression(&self.function)?;
        // a constant function still has its variable
        function.vars.intern(self.var.clone())?;

        let mut derivative = function.diff(&self.var)?;
        for diagnostic in derivative.simplify() {
            info!("derivative: {}", diagnostic);
        }
        let taylor = function.taylor_series(&self.var, self.taylor_at, self.taylor_order)?;
        let tangent = function.tangent_line(&self.var, self.tangent_at)?;
        info!("task for f({}) solved", self.var);

        Ok(TaskReport {
            var: self.var.clone(),
            function: function.to_latex()?,
            derivative: derivative.to_latex()?,
            taylor: taylor.to_latex()?,
            tangent: tangent.to_latex()?,
            plot_function: function.to_plottable(),
            plot_taylor: taylor.to_plottable(),
            plot_tangent: tangent.to_plottable(),
            range: self.range,
        })
    }
}

impl fmt::Display for TaskReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let v = &self.var;
        writeln!(f, "f({}) = {}", v, self.function)?;
        writeln!(f, "f'({}) = {}", v, self.derivative)?;
        writeln!(f, "Taylor polynomial: {}", self.taylor)?;
        writeln!(f, "Tangent line: {}", self.tangent)?;
        writeln!(
            f,
            "plot [{}:{}] {}, {}, {}",
            self.range.0, self.range.1, self.plot_function, self.plot_taylor, self.plot_tangent
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(function: &str) -> DiffTask {
        DiffTask {
            var: "x".to_string(),
            function: function.to_string(),
            taylor_at: 0.0,
            taylor_order: 3,
            tangent_at: 0.0,
            range: (-1.0, 1.0),
        }
    }

    #[test]
    fn test_solve_sine() {
        let report = task("\\sin x").solve().unwrap();
        assert_eq!(report.function, "\\sin x");
        assert_eq!(report.derivative, "\\cos x");
        assert_eq!(report.taylor, "x - \\frac{x^{3}}{6}");
        assert_eq!(report.tangent, "x");
        assert_eq!(report.plot_function, "sin(x)");
        let text = report.to_string();
        assert!(text.contains("plot [-1:1] sin(x), (x - ((x**3)/6)), x"));
    }

    #[test]
    fn test_solve_constant_function() {
        let report = task("5").solve().unwrap();
        assert_eq!(report.derivative, "0");
        assert_eq!(report.taylor, "5");
        assert_eq!(report.tangent, "5");
    }

    #[test]
    fn test_solve_reports_parse_errors() {
        assert!(matches!(
            task("(x + 1").solve(),
            Err(SymbolicError::Parse(_))
        ));
    }
}
