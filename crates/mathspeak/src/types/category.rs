use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Structural category of an expression, chosen by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionCategory {
    Fraction,
    Integral,
    Derivative,
    Limit,
    Sum,
    Product,
    Matrix,
    Equation,
    Inequality,
    FunctionCall,
    Series,
    Simple,
    Complex,
}

impl ExpressionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpressionCategory::Fraction => "fraction",
            ExpressionCategory::Integral => "integral",
            ExpressionCategory::Derivative => "derivative",
            ExpressionCategory::Limit => "limit",
            ExpressionCategory::Sum => "sum",
            ExpressionCategory::Product => "product",
            ExpressionCategory::Matrix => "matrix",
            ExpressionCategory::Equation => "equation",
            ExpressionCategory::Inequality => "inequality",
            ExpressionCategory::FunctionCall => "function_call",
            ExpressionCategory::Series => "series",
            ExpressionCategory::Simple => "simple",
            ExpressionCategory::Complex => "complex",
        }
    }
}

impl Display for ExpressionCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
