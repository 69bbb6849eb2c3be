// Prompt templates for LLM interactions
//
// Every prompt the manager sends lives here. Templates use `{{name}}`
// placeholders; unknown placeholders are left untouched.

use std::collections::HashMap;

/// Prompt template structure
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub name: String,
    pub version: String,
    pub system: String,
    pub user_template: String,
}

impl PromptTemplate {
    /// Render the user template with variables
    pub fn render(&self, variables: &HashMap<String, String>) -> String {
        variables
            .iter()
            .fold(self.user_template.clone(), |rendered, (key, value)| {
                rendered.replace(&format!("{{{{{key}}}}}"), value)
            })
    }

    /// Render a template that takes a single variable
    pub fn render_one(&self, key: &str, value: &str) -> String {
        let mut variables = HashMap::new();
        variables.insert(key.to_string(), value.to_string());
        self.render(&variables)
    }
}

pub mod library {
    use super::PromptTemplate;

    /// Standing instructions for the manager plus the goal turn
    pub fn delegation() -> PromptTemplate {
        PromptTemplate {
            name: "delegation".to_string(),
            version: "1.0.0".to_string(),
            system: "You act on my behalf in a conversation with an AI assistant.\n\
                     \n\
                     ## Goal\n\
                     \n\
                     I will tell you what I want to achieve. Keep instructing the assistant \
                     until my goal is achieved at the highest possible quality.\n\
                     \n\
                     ## Notes\n\
                     \n\
                     Continue the conversation until you are confident the goal is met. \
                     Expect expert-level results and talk to the assistant as many times as \
                     that takes. If the goal is too large for one instruction, break it into \
                     small subtasks, hand over only the first one, and assign the rest in \
                     later turns. You are the assistant's manager and reviewer.\n\
                     \n\
                     ## Format\n\
                     \n\
                     ### Your input\n\
                     \n\
                     Human> [my goal]\n\
                     \n\
                     Worker> [the assistant's answer]\n\
                     \n\
                     ### Your output\n\
                     \n\
                     Always answer with a single JSON object in this shape:\n\
                     \n\
                     ```json\n\
                     {\n\
                     \x20   \"metadata\": {\n\
                     \x20       \"continue\": boolean // keep going? yes: true, no: false\n\
                     \x20   },\n\
                     \x20   \"payload\": {\n\
                     \x20       \"to\": string, // recipient. Allowed values: HUMAN, AI\n\
                     \x20       \"message\": string, // the message itself\n\
                     \x20       \"tasks\": [string], // remaining subtasks\n\
                     \x20       \"next_task\": string // the subtask you are assigning now\n\
                     \x20   }\n\
                     }\n\
                     ```\n"
                .to_string(),
            user_template: "Human> {{goal}}".to_string(),
        }
    }

    /// Wraps a worker's result as a manager user turn
    pub fn worker_result() -> PromptTemplate {
        PromptTemplate {
            name: "worker_result".to_string(),
            version: "1.0.0".to_string(),
            system: String::new(),
            user_template: "Worker> {{result}}".to_string(),
        }
    }

    /// Final request for the human-facing report
    pub fn final_report() -> PromptTemplate {
        PromptTemplate {
            name: "final_report".to_string(),
            version: "1.0.0".to_string(),
            system: String::new(),
            user_template: "Human> Summarize the conversation so far into a report for me.\n\
                            \n\
                            Do your best to help me achieve my original goal: {{goal}}\n\
                            \n\
                            Use Markdown.\n\
                            \n\
                            # Conversation summary\n"
                .to_string(),
        }
    }
}
