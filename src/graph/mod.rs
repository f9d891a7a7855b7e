//! Filter-graph program model
//!
//! Stages are typed descriptors (filter name plus ordered, typed parameters). Turning them
//! into the engine's text format happens only in the `Display` impls below, which is also
//! the only place values get escaped.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::domain::rules::AudioStrategy;
use crate::error::{ShortcastError, ShortcastResult};

pub mod compiler;

pub use compiler::GraphCompiler;

/// Label of the final video output
pub const VIDEO_OUTPUT: &str = "v";
/// Label of the final audio output
pub const AUDIO_OUTPUT: &str = "aout";

/// Format seconds or ratios with at most three decimals and no trailing zeros
pub fn format_number(value: f64) -> String {
    let value = if value.abs() < 0.0005 { 0.0 } else { value };
    let text = format!("{:.3}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.to_string()
}

/// Escape a value for the option parser, then for the graph parser
///
/// The engine unescapes filter arguments twice: once when splitting the graph into
/// filters and once when splitting a filter's arguments into options.
pub fn escape_value(raw: &str) -> String {
    let mut option_level = String::with_capacity(raw.len() + 8);
    for ch in raw.chars() {
        if matches!(ch, '\\' | '\'' | ':') {
            option_level.push('\\');
        }
        option_level.push(ch);
    }

    let mut graph_level = String::with_capacity(option_level.len() + 8);
    for ch in option_level.chars() {
        if matches!(ch, '\\' | '\'' | '[' | ']' | ',' | ';') {
            graph_level.push('\\');
        }
        graph_level.push(ch);
    }
    graph_level
}

/// Typed parameter value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ParamValue {
    Int(i64),
    Number(f64),
    /// Fixed token chosen by the compiler (`in`, `fill`, `increase`)
    Literal(&'static str),
    /// Engine expression, single-quoted so commas survive graph parsing
    Expr(String),
    /// Free-form value (paths, colors) escaped for both parser levels
    Escaped(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(value) => write!(f, "{}", value),
            ParamValue::Number(value) => write!(f, "{}", format_number(*value)),
            ParamValue::Literal(token) => write!(f, "{}", token),
            ParamValue::Expr(expr) => write!(f, "'{}'", expr),
            ParamValue::Escaped(raw) => write!(f, "{}", escape_value(raw)),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(value as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<&'static str> for ParamValue {
    fn from(token: &'static str) -> Self {
        ParamValue::Literal(token)
    }
}

/// One filter with its named parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stage {
    pub name: &'static str,
    pub params: Vec<(&'static str, ParamValue)>,
}

impl Stage {
    /// Create a stage without parameters
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            params: Vec::new(),
        }
    }

    /// Append a parameter
    pub fn param(mut self, key: &'static str, value: impl Into<ParamValue>) -> Self {
        self.params.push((key, value.into()));
        self
    }

    /// Append a quoted expression parameter
    pub fn expr(mut self, key: &'static str, expr: impl Into<String>) -> Self {
        self.params.push((key, ParamValue::Expr(expr.into())));
        self
    }

    /// Append a free-form parameter that needs escaping
    pub fn escaped(mut self, key: &'static str, raw: impl Into<String>) -> Self {
        self.params.push((key, ParamValue::Escaped(raw.into())));
        self
    }

    /// Append a file path parameter
    pub fn path(self, key: &'static str, path: &Path) -> Self {
        self.escaped(key, path.to_string_lossy().into_owned())
    }

    /// Value of the first parameter with this key
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for (index, (key, value)) in self.params.iter().enumerate() {
            let separator = if index == 0 { '=' } else { ':' };
            write!(f, "{}{}={}", separator, key, value)?;
        }
        Ok(())
    }
}

/// Pad label: an input stream specifier (`0:v`) or a named intermediate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Label(String);

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Video stream of the given engine input
    pub fn video_input(index: usize) -> Self {
        Self(format!("{}:v", index))
    }

    /// Audio stream of the given engine input
    pub fn audio_input(index: usize) -> Self {
        Self(format!("{}:a", index))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Input index when this label is a stream specifier
    pub fn stream_input(&self) -> Option<usize> {
        let (index, kind) = self.0.split_once(':')?;
        if !matches!(kind, "v" | "a") {
            return None;
        }
        index.parse().ok()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

/// Linear run of stages from its input labels to one output label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterChain {
    pub inputs: Vec<Label>,
    pub stages: Vec<Stage>,
    pub output: Label,
}

impl FilterChain {
    /// Create a chain
    pub fn new(inputs: Vec<Label>, stages: Vec<Stage>, output: Label) -> Self {
        Self {
            inputs,
            stages,
            output,
        }
    }

    /// Names of the stages in order
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name).collect()
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for input in &self.inputs {
            write!(f, "{}", input)?;
        }
        for (index, stage) in self.stages.iter().enumerate() {
            if index > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", stage)?;
        }
        write!(f, "{}", self.output)
    }
}

/// Complete program for the engine: one video chain and optional audio chains
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterGraph {
    pub video: FilterChain,
    /// Chains in dependency order; empty when the output is silent
    pub audio: Vec<FilterChain>,
    pub audio_strategy: AudioStrategy,
}

impl FilterGraph {
    /// Final video label
    pub fn video_output(&self) -> &Label {
        &self.video.output
    }

    /// Final audio label, absent for silent output
    pub fn audio_output(&self) -> Option<&Label> {
        self.audio.last().map(|chain| &chain.output)
    }

    /// All chains in emission order
    pub fn chains(&self) -> impl Iterator<Item = &FilterChain> {
        std::iter::once(&self.video).chain(self.audio.iter())
    }

    /// The program text, chains joined by `;`
    pub fn program(&self) -> String {
        self.to_string()
    }

    /// Check that every consumed label was declared or produced earlier
    pub fn validate(&self, input_count: usize) -> ShortcastResult<()> {
        let mut produced: HashSet<&Label> = HashSet::new();

        for chain in self.chains() {
            if chain.stages.is_empty() {
                return Err(ShortcastError::GraphError {
                    message: format!("chain ending in {} has no stages", chain.output),
                });
            }
            for input in &chain.inputs {
                let declared = matches!(input.stream_input(), Some(index) if index < input_count);
                if !declared && !produced.remove(input) {
                    return Err(ShortcastError::GraphError {
                        message: format!("{} is consumed but never produced", input),
                    });
                }
            }
            if !produced.insert(&chain.output) {
                return Err(ShortcastError::GraphError {
                    message: format!("{} is produced twice", chain.output),
                });
            }
        }

        let expected = std::iter::once(self.video_output()).chain(self.audio_output());
        for label in expected {
            produced.remove(label);
        }
        if let Some(dangling) = produced.into_iter().next() {
            return Err(ShortcastError::GraphError {
                message: format!("{} is produced but never consumed", dangling),
            });
        }
        Ok(())
    }
}

impl fmt::Display for FilterGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, chain) in self.chains().enumerate() {
            if index > 0 {
                write!(f, ";")?;
            }
            write!(f, "{}", chain)?;
        }
        Ok(())
    }
}
