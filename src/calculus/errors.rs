use crate::symbolic::symbolic_traits::EngineError;
use thiserror::Error;

/// Everything that can go wrong in a calculus request.
///
/// Each computation error carries the expression text it was working on and a readable message.
#[derive(Debug, Error)]
pub enum CalculusError {
    /// reserved: normalization is total and never raises it
    #[error("ambiguous notation in '{0}'")]
    NormalizationAmbiguity(String),
    #[error("engine cannot parse '{expression}': {message}")]
    EngineParse { expression: String, message: String },
    #[error("engine cannot evaluate '{expression}': {message}")]
    EngineEvaluate { expression: String, message: String },
    #[error("derivative of '{expression}' failed: {message}")]
    Derivative { expression: String, message: String },
    #[error("limit of '{expression}' failed: {message}")]
    Limit { expression: String, message: String },
    #[error("epsilon-delta analysis of '{expression}' failed: {message}")]
    EpsilonDelta { expression: String, message: String },
    #[error("cannot sample '{expression}' for plotting: {message}")]
    Plot { expression: String, message: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("settings error: {0}")]
    Settings(String),
    #[error("rendering failed: {0}")]
    Render(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl From<EngineError> for CalculusError {
    fn from(error: EngineError) -> Self {
        match &error {
            EngineError::Parse { expression, source } => CalculusError::EngineParse {
                expression: expression.clone(),
                message: source.to_string(),
            },
            EngineError::Evaluate { expression, source } => CalculusError::EngineEvaluate {
                expression: expression.clone(),
                message: source.to_string(),
            },
            EngineError::Differentiate { expression, source } => CalculusError::EngineEvaluate {
                expression: expression.clone(),
                message: source.to_string(),
            },
        }
    }
}

impl CalculusError {
    pub fn derivative(expression: &str, message: impl ToString) -> Self {
        CalculusError::Derivative {
            expression: expression.to_string(),
            message: message.to_string(),
        }
    }

    pub fn limit(expression: &str, message: impl ToString) -> Self {
        CalculusError::Limit {
            expression: expression.to_string(),
            message: message.to_string(),
        }
    }

    pub fn epsilon_delta(expression: &str, message: impl ToString) -> Self {
        CalculusError::EpsilonDelta {
            expression: expression.to_string(),
            message: message.to_string(),
        }
    }

    pub fn plot(expression: &str, message: impl ToString) -> Self {
        CalculusError::Plot {
            expression: expression.to_string(),
            message: message.to_string(),
        }
    }
}
