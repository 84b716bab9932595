//! Loader of the task file handed to the command-line driver:
//!
//! ```text
//! $f(x) = \sin x \cdot x^2$
//! Taylor series at 0 to $x^5$
//! Tangent at $x = 1.5$
//! Plot in range [-2, 2]
//! ```
//! Sections come in this order, separated by any whitespace. The variable named in the
//! Taylor and tangent sections must be the function variable, and the plot range must
//! satisfy start < end.
use crate::symbolic::symbolic_errors::TaskError;
use log::debug;
use nom::{
    IResult, Parser,
    bytes::complete::{tag, take_until},
    character::complete::{digit1, multispace0, space0, space1},
    combinator::{map, map_res},
    number::complete::double,
    sequence::{delimited, preceded},
};
use std::cmp::Ordering;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct DiffTask {
    pub var: String,
    pub function: String,
    pub taylor_at: f64,
    pub taylor_order: usize,
    pub tangent_at: f64,
    pub range: (f64, f64),
}

/// `$f(<var>) = <expression>$`
pub(crate) fn parse_function(input: &str) -> IResult<&str, (String, String)> {
    let mut parser = (
        preceded(multispace0, tag("$f(")),
        take_until(")"),
        delimited(space0, tag(")"), space0),
        (tag("="), space0),
        take_until("$"),
        tag("$"),
    );
    let (input, (_, var, _, _, function, _)) = parser.parse(input)?;
    Ok((input, (var.trim().to_string(), function.trim().to_string())))
}

/// `Taylor series at <center> to $<var>^<order>$`
pub(crate) fn parse_taylor(input: &str) -> IResult<&str, (f64, String, usize)> {
    let order = map_res(digit1, |s: &str| s.parse::<usize>());
    let mut parser = (
        preceded(multispace0, tag("Taylor series at")),
        preceded(space1, double),
        (space1, tag("to"), space0, tag("$")),
        map(take_until("^"), |s: &str| s.trim().to_string()),
        tag("^"),
        delimited(space0, order, space0),
        tag("$"),
    );
    let (input, (_, center, _, var, _, order, _)) = parser.parse(input)?;
    Ok((input, (center, var, order)))
}

/// `Tangent at $<var> = <point>$`
pub(crate) fn parse_tangent(input: &str) -> IResult<&str, (String, f64)> {
    let mut parser = (
        preceded(multispace0, tag("Tangent at")),
        (space0, tag("$")),
        map(take_until("="), |s: &str| s.trim().to_string()),
        tag("="),
        delimited(space0, double, space0),
        tag("$"),
    );
    let (input, (_, _, var, _, point, _)) = parser.parse(input)?;
    Ok((input, (var, point)))
}

/// `Plot in range [<start>, <end>]`
pub(crate) fn parse_range(input: &str) -> IResult<&str, (f64, f64)> {
    let mut parser = (
        preceded(multispace0, tag("Plot in range")),
        (space0, tag("[")),
        delimited(space0, double, space0),
        tag(","),
        delimited(space0, double, space0),
        tag("]"),
    );
    let (input, (_, _, start, _, end, _)) = parser.parse(input)?;
    Ok((input, (start, end)))
}

fn section<'a, T>(
    result: IResult<&'a str, T>,
    section: &'static str,
) -> Result<(&'a str, T), TaskError> {
    result.map_err(|e| TaskError::Format {
        section,
        detail: e.to_string(),
    })
}

fn check_var(section: &'static str, expected: &str, found: String) -> Result<(), TaskError> {
    if expected == found {
        Ok(())
    } else {
        Err(TaskError::VariableMismatch {
            section,
            expected: expected.to_string(),
            found,
        })
    }
}

impl DiffTask {
    pub fn parse(input: &str) -> Result<DiffTask, TaskError> {
        let (input, (var, function)) = section(parse_function(input), "function")?;
        let (input, (taylor_at, taylor_var, taylor_order)) =
            section(parse_taylor(input), "Taylor series")?;
        check_var("Taylor series", &var, taylor_var)?;
        let (input, (tangent_var, tangent_at)) = section(parse_tangent(input), "tangent")?;
        check_var("tangent", &var, tangent_var)?;
        let (input, (start, end)) = section(parse_range(input), "range")?;
        if start.partial_cmp(&end) != Some(Ordering::Less) {
            return Err(TaskError::InvalidRange { start, end });
        }
        if !input.trim().is_empty() {
            return Err(TaskError::Format {
                section: "end of file",
                detail: format!("unexpected trailing text '{}'", input.trim()),
            });
        }
        let task = DiffTask {
            var,
            function,
            taylor_at,
            taylor_order,
            tangent_at,
            range: (start, end),
        };
        debug!("loaded task {:?}", task);
        Ok(task)
    }

    pub fn from_file(path: &Path) -> Result<DiffTask, TaskError> {
        let content = fs::read_to_string(path)?;
        DiffTask::parse(&content)
    }
}
