//! Prompt templates and prompt assembly.
//!
//! Each task type owns one immutable [`PromptTemplate`]. The builders glue a
//! template to per-request parameters in a fixed order; the provider model was
//! tuned against that order, so it must not change.

pub mod enhance;
pub mod translate;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use thiserror::Error;

use self::enhance::ENHANCE_TEMPLATE;
use self::translate::TRANSLATION_TEMPLATE;

/// Default directive for the writing assistant when the caller sends none.
pub const DEFAULT_ENHANCE_DIRECTIVE: &str =
    "Improve clarity, grammar, and flow while preserving the original meaning and tone.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskType {
    Translation,
    Enhancement,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Translation => "translation",
            TaskType::Enhancement => "enhancement",
        }
    }

    /// Top-level `error` string used when the provider call for this task fails.
    pub fn failure_label(&self) -> &'static str {
        match self {
            TaskType::Translation => "Failed to process message",
            TaskType::Enhancement => "Failed to process enhancement",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "translation" => Ok(TaskType::Translation),
            "enhancement" | "enhance" => Ok(TaskType::Enhancement),
            other => Err(PromptError::UnknownTaskType(other.to_string())),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PromptError {
    #[error("No prompt template registered for task type '{0}'")]
    UnknownTaskType(String),
}

/// Three ordered prose blocks sent ahead of the per-request lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub head: &'static str,
    pub guide: &'static str,
    pub instruction: &'static str,
}

#[derive(Debug, Clone)]
pub struct PromptTemplateStore {
    templates: HashMap<TaskType, PromptTemplate>,
}

static BUILTIN_STORE: Lazy<PromptTemplateStore> = Lazy::new(|| {
    PromptTemplateStore::empty()
        .with_template(TaskType::Translation, TRANSLATION_TEMPLATE)
        .with_template(TaskType::Enhancement, ENHANCE_TEMPLATE)
});

impl PromptTemplateStore {
    /// The templates shipped with the app, built once per process.
    pub fn builtin() -> &'static PromptTemplateStore {
        &BUILTIN_STORE
    }

    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    pub fn with_template(mut self, task: TaskType, template: PromptTemplate) -> Self {
        self.templates.insert(task, template);
        self
    }

    pub fn get(&self, task: TaskType) -> Result<&PromptTemplate, PromptError> {
        self.templates
            .get(&task)
            .ok_or_else(|| PromptError::UnknownTaskType(task.as_str().to_string()))
    }

    /// Lookup by task name, e.g. `"translation"`.
    pub fn get_by_name(&self, name: &str) -> Result<&PromptTemplate, PromptError> {
        self.get(name.parse()?)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TranslationPromptParams<'a> {
    pub additional_instruction: &'a str,
    pub source_language: &'a str,
    pub target_language: &'a str,
    pub text: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct EnhancePromptParams<'a> {
    pub text: &'a str,
    pub language: &'a str,
    pub directive: &'a str,
    /// Previous assistant output; empty for a fresh request.
    pub prior_output: &'a str,
}

/// head, guide, instruction, optional extra instruction, `Start`, `Destination`, then the text.
pub fn build_translation_prompt(
    template: &PromptTemplate,
    params: &TranslationPromptParams<'_>,
) -> String {
    let mut prompt = String::with_capacity(
        template.head.len() + template.guide.len() + template.instruction.len() + params.text.len() + 128,
    );

    prompt.push_str(template.head);
    prompt.push_str(template.guide);
    prompt.push_str(template.instruction);
    if !params.additional_instruction.is_empty() {
        prompt.push_str(params.additional_instruction);
        prompt.push('\n');
    }
    prompt.push_str(&format!("Start : {}\n", params.source_language));
    prompt.push_str(&format!("Destination : {}\n", params.target_language));
    prompt.push_str("### Text ###\n");
    prompt.push_str(params.text);

    prompt
}

pub fn build_enhance_prompt(template: &PromptTemplate, params: &EnhancePromptParams<'_>) -> String {
    [
        template.head,
        template.guide,
        template.instruction,
        format!("Language: {}\n", params.language).as_str(),
        format!("Directive: {}\n\n", params.directive).as_str(),
        format!("<<<TEXT>>>\n{}\n<<<TEXT>>>\n\n", params.text).as_str(),
        format!("**Assistant output:**\n{}", params.prior_output).as_str(),
    ]
    .concat()
}
