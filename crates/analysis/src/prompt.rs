//! Prompt construction.
//!
//! Produces a system instruction and a user prompt from the validated tasks
//! and the day's commitments. The user prompt always carries the literal
//! output schema and the "JSON only" rule; the normalizer depends on both.

use agendai_core::{CalendarEvent, Task};
use serde::Serialize;

/// Rendered in place of the task list when there are no tasks.
pub const NO_TASKS_MARKER: &str = "Nenhuma tarefa informada.";

/// Rendered when there are neither calendar events nor fixed commitments.
pub const NO_EVENTS_MARKER: &str = "Nenhum evento fixo de agenda para considerar.";

const SYSTEM_INSTRUCTION: &str = "Você é um assistente de produtividade. Organize e analise as tarefas do usuário. \
Você DEVE considerar a agenda do usuário para priorizar as tarefas de forma realista. \
Você DEVE responder APENAS com um objeto JSON válido, sem NENHUM texto introdutório ou adicional \
e sem blocos de código Markdown. \
Se a lista de tarefas estiver vazia, retorne o objeto JSON com as chaves esperadas e valores vazios.";

/// The exact shape the model must return.
pub const OUTPUT_SCHEMA: &str = r#"{
    "lista_ordenada": [ { "titulo": "...", "prioridade": "...", "motivo": "..." } ],
    "motivo_ordem": "...",
    "recomendacoes": "...",
    "primeira_tarefa": "...",
    "sugestoes": "...",
    "sub_tarefas_sugeridas": [ { "tarefa_original": "título da tarefa", "sub_tarefas": ["subtarefa 1", "subtarefa 2"] } ],
    "relatorio": "Um resumo conciso de toda a sua análise, usando no máximo 5 frases. Não use Markdown (como **, #, *) ou listas aqui."
}"#;

/// A ready-to-send prompt pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system_instruction: String,
    pub user_prompt: String,
}

/// Builder for [`Prompt`].
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder<'a> {
    tasks: &'a [Task],
    events: &'a [CalendarEvent],
    commitments: &'a [String],
}

impl<'a> PromptBuilder<'a> {
    pub fn new(tasks: &'a [Task]) -> Self {
        Self {
            tasks,
            events: &[],
            commitments: &[],
        }
    }

    /// Structured calendar events.
    pub fn events(mut self, events: &'a [CalendarEvent]) -> Self {
        self.events = events;
        self
    }

    /// Caller-supplied commitments as free text.
    pub fn commitments(mut self, commitments: &'a [String]) -> Self {
        self.commitments = commitments;
        self
    }

    pub fn build(&self) -> Prompt {
        let tasks = if self.tasks.is_empty() {
            NO_TASKS_MARKER.to_string()
        } else {
            pretty_json(self.tasks)
        };

        let mut agenda = Vec::new();
        if !self.events.is_empty() {
            agenda.push(pretty_json(self.events));
        }
        if !self.commitments.is_empty() {
            agenda.push(
                self.commitments
                    .iter()
                    .map(|c| format!("- {c}"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
        }
        let agenda = if agenda.is_empty() {
            NO_EVENTS_MARKER.to_string()
        } else {
            agenda.join("\n")
        };

        let user_prompt = format!(
            "Tarefas a analisar (prioridade 1 = mais importante):\n\
{tasks}\n\
\n\
Compromissos Fixos da Agenda (não podem ser alterados):\n\
{agenda}\n\
\n\
Estrutura JSON que você DEVE seguir, com exatamente estas chaves:\n\
{OUTPUT_SCHEMA}\n\
\n\
Regras:\n\
- Responda SOMENTE com o objeto JSON acima, sem texto antes ou depois.\n\
- Ordene as tarefas pela prioridade (menor número = maior prioridade) e depois pelo prazo mais próximo.\n\
- lista_ordenada deve conter exatamente as tarefas informadas, sem inventar nem omitir nenhuma.\n\
- Use os compromissos da agenda apenas como restrições de horário para distribuir o tempo; nunca os liste como tarefas.\n\
- Preencha sub_tarefas_sugeridas apenas para tarefas grandes, quebrando-as em passos menores e acionáveis; caso contrário deixe a lista vazia.\n\
- relatorio deve ser texto simples, sem Markdown nem listas.\n"
        );

        Prompt {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            user_prompt,
        }
    }
}

/// Build a prompt from tasks and structured events.
pub fn build_prompt(tasks: &[Task], events: &[CalendarEvent]) -> Prompt {
    PromptBuilder::new(tasks).events(events).build()
}

fn pretty_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event() -> CalendarEvent {
        let day = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        CalendarEvent::new(
            "Dentista",
            day.and_hms_opt(10, 0, 0).unwrap(),
            day.and_hms_opt(11, 30, 0).unwrap(),
            "Clínica Central",
        )
    }

    #[test]
    fn empty_task_list_uses_marker_not_literal() {
        let prompt = build_prompt(&[], &[]);
        assert!(prompt.user_prompt.contains(NO_TASKS_MARKER));
        assert!(!prompt.user_prompt.contains("[]\n"));
        assert!(prompt.user_prompt.contains(NO_EVENTS_MARKER));
    }

    #[test]
    fn prompt_mentions_task_title_and_event_window() {
        let tasks = vec![Task::new("Write report").with_priority(1)];
        let prompt = build_prompt(&tasks, &[event()]);
        assert!(prompt.user_prompt.contains("Write report"));
        assert!(prompt.user_prompt.contains("2026-10-19 10:00"));
        assert!(prompt.user_prompt.contains("2026-10-19 11:30"));
        assert!(!prompt.user_prompt.contains(NO_EVENTS_MARKER));
    }

    #[test]
    fn schema_lists_every_output_key() {
        let prompt = build_prompt(&[Task::new("a")], &[]);
        for key in [
            "lista_ordenada",
            "motivo_ordem",
            "recomendacoes",
            "primeira_tarefa",
            "sugestoes",
            "sub_tarefas_sugeridas",
            "relatorio",
        ] {
            assert!(prompt.user_prompt.contains(key), "schema is missing {key}");
        }
        assert!(prompt.user_prompt.contains("SOMENTE com o objeto JSON"));
        assert!(prompt.system_instruction.contains("APENAS com um objeto JSON"));
    }

    #[test]
    fn events_are_constraints_not_tasks() {
        let prompt = build_prompt(&[Task::new("a")], &[event()]);
        assert!(prompt.user_prompt.contains("nunca os liste como tarefas"));
        assert!(prompt.user_prompt.contains("apenas para tarefas grandes"));
    }

    #[test]
    fn fixed_commitments_render_as_lines() {
        let tasks = vec![Task::new("Gym")];
        let commitments = vec!["Treino de Tênis - 18:00 às 19:30 - Clube".to_string()];
        let prompt = PromptBuilder::new(&tasks).commitments(&commitments).build();
        assert!(prompt.user_prompt.contains("- Treino de Tênis - 18:00 às 19:30 - Clube"));
        assert!(!prompt.user_prompt.contains(NO_EVENTS_MARKER));
    }

    #[test]
    fn optional_task_fields_are_rendered_when_present() {
        let tasks = vec![Task::new("Tax return").with_deadline("2026-10-31").with_priority(2)];
        let prompt = build_prompt(&tasks, &[]);
        assert!(prompt.user_prompt.contains("\"prazo\": \"2026-10-31\""));
        assert!(prompt.user_prompt.contains("\"prioridade\": 2"));
    }
}
