#![allow(dead_code)]

use async_trait::async_trait;
use rstring::errors::RstringError;
use rstring::interactive::Prompter;
use rstring::rsync::FileLister;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Lists a fixed set of files and rejects args containing `reject`.
pub struct StaticLister {
    files: Vec<String>,
    reject: Option<String>,
    pub calls: Mutex<Vec<Vec<String>>>,
}

impl StaticLister {
    pub fn new(files: &[&str]) -> Self {
        StaticLister {
            files: strings(files),
            reject: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(mut self, token: &str) -> Self {
        self.reject = Some(token.to_owned());
        self
    }

    pub fn last_call(&self) -> Option<Vec<String>> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl FileLister for StaticLister {
    async fn list(&self, args: &[String]) -> Result<Vec<String>, RstringError> {
        self.calls.lock().unwrap().push(args.to_vec());
        if let Some(reject) = &self.reject {
            if args.iter().any(|arg| arg.contains(reject.as_str())) {
                return Err(RstringError::RsyncFailed {
                    status: "exit status: 1".to_owned(),
                    stderr: format!("rsync: unknown option {}", reject),
                });
            }
        }
        Ok(self.files.clone())
    }
}

/// Answers prompts from a script, failing once it runs out.
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        ScriptedPrompter {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            prompts: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String, RstringError> {
        self.prompts.push(prompt.to_owned());
        self.answers
            .pop_front()
            .ok_or_else(|| RstringError::PromptError("no more scripted answers".to_owned()))
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn tool_available(program: &str) -> bool {
    std::process::Command::new(program)
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}
