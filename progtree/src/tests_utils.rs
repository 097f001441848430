//! Fixed grammar used by tests and benchmarks.
//!
//! ```text
//! @input string v;
//! int k; string s; list xs; program q;
//! program := Substring(k, k) | Concat(program, program) | Const(s)
//!          | Upper(program) | Input(v) | Join(xs) | Apply(q);
//! ```
//!
//! `Substring(start, end)` takes the characters `[start, end)` of the input.
use crate::{
    error::{TreeError, TreeResult},
    eval::State,
    grammar::{Grammar, Rule, SymbolKind},
    value::DynamicValue,
};

pub const INPUT_SYMBOL: &str = "v";

fn input_text<'a>(state: &'a State, rule: &str) -> TreeResult<&'a str> {
    state
        .get_by_name(INPUT_SYMBOL)
        .and_then(DynamicValue::as_str)
        .ok_or_else(|| TreeError::Evaluation {
            rule: rule.to_string(),
            message: "input is not bound to a string".to_string(),
        })
}

fn text_arg<'a>(args: &'a [DynamicValue], index: usize, rule: &str) -> TreeResult<&'a str> {
    args[index].as_str().ok_or_else(|| TreeError::ArgumentKind {
        rule: rule.to_string(),
        expected: "string",
    })
}

fn substring(state: &State, args: &[DynamicValue]) -> TreeResult<DynamicValue> {
    let input = input_text(state, "Substring")?;
    let bound = |value: &DynamicValue| {
        value
            .as_i64()
            .and_then(|v| usize::try_from(v).ok())
            .ok_or_else(|| TreeError::ArgumentKind {
                rule: "Substring".to_string(),
                expected: "non-negative integer",
            })
    };
    let (start, end) = (bound(&args[0])?, bound(&args[1])?);

    let len = input.chars().count();
    if start > end || end > len {
        return Err(TreeError::Evaluation {
            rule: "Substring".to_string(),
            message: format!("range {}..{} out of bounds for length {}", start, end, len),
        });
    }

    Ok(input.chars().skip(start).take(end - start).collect::<String>().into())
}

fn concat(_: &State, args: &[DynamicValue]) -> TreeResult<DynamicValue> {
    let left = text_arg(args, 0, "Concat")?;
    let right = text_arg(args, 1, "Concat")?;
    Ok(format!("{}{}", left, right).into())
}

fn constant(_: &State, args: &[DynamicValue]) -> TreeResult<DynamicValue> {
    text_arg(args, 0, "Const").map(DynamicValue::from)
}

fn upper(_: &State, args: &[DynamicValue]) -> TreeResult<DynamicValue> {
    Ok(text_arg(args, 0, "Upper")?.to_uppercase().into())
}

fn input(_: &State, args: &[DynamicValue]) -> TreeResult<DynamicValue> {
    Ok(args[0].clone())
}

fn join(_: &State, args: &[DynamicValue]) -> TreeResult<DynamicValue> {
    let items = args[0].as_list().ok_or_else(|| TreeError::ArgumentKind {
        rule: "Join".to_string(),
        expected: "list",
    })?;
    Ok(items
        .iter()
        .map(|item| match item {
            DynamicValue::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<String>()
        .into())
}

fn apply(state: &State, args: &[DynamicValue]) -> TreeResult<DynamicValue> {
    let program = args[0].as_program().ok_or_else(|| TreeError::ArgumentKind {
        rule: "Apply".to_string(),
        expected: "program",
    })?;
    program.invoke(state)
}

/// Build the substring grammar described in the module documentation.
pub fn substring_grammar() -> Grammar {
    Grammar::builder("substring")
        .symbol(INPUT_SYMBOL, SymbolKind::Input)
        .and_then(|b| b.symbol("k", SymbolKind::Literal))
        .and_then(|b| b.symbol("s", SymbolKind::Literal))
        .and_then(|b| b.symbol("xs", SymbolKind::Literal))
        .and_then(|b| b.symbol("q", SymbolKind::Literal))
        .and_then(|b| b.symbol("program", SymbolKind::Nonterminal))
        .and_then(|b| b.rule(Rule::new("Substring", 2).with_semantics(substring)))
        .and_then(|b| b.rule(Rule::new("Concat", 2).with_semantics(concat)))
        .and_then(|b| b.rule(Rule::new("Const", 1).with_semantics(constant)))
        .and_then(|b| b.rule(Rule::new("Upper", 1).with_semantics(upper)))
        .and_then(|b| b.rule(Rule::new("Input", 1).with_semantics(input)))
        .and_then(|b| b.rule(Rule::new("Join", 1).with_semantics(join)))
        .and_then(|b| b.rule(Rule::new("Apply", 1).with_semantics(apply)))
        .map(|b| b.build())
        .expect("substring grammar definitions are unique")
}
