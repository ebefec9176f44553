//! Interactive terminal front-end.
//!
//! Stands in for the browser rendering layer: owns the two forms, turns
//! typed commands into [`Action`]s, and reprints the rendered snapshot
//! after every dispatch. Nothing here mutates view state directly.

use std::io::{self, Write};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app::{Action, App, ViewMode, ViewState};
use crate::forms::{ObservationForm, PatientForm};
use crate::notify::NotificationSink;
use crate::view;

/// Notification sink that prints toast-style lines to the terminal.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn success(&self, message: &str) {
        println!("  [ok] {message}");
    }

    fn error(&self, message: &str) {
        println!("  [!!] {message}");
    }
}

pub struct Shell {
    app: Arc<App>,
    patient_form: PatientForm,
    observation_form: ObservationForm,
}

impl Shell {
    pub fn new(app: Arc<App>) -> Self {
        Self {
            app,
            patient_form: PatientForm::new(),
            observation_form: ObservationForm::new(),
        }
    }

    /// Run the interactive loop until `quit` or end of input.
    pub async fn run(&mut self) -> io::Result<()> {
        // Mount: the roster is fetched before the first prompt.
        self.app.load_patients().await;
        self.redraw().await;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("mediflow> ");
            io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            if !self.handle(line.trim()).await {
                break;
            }
            self.redraw().await;
        }
        Ok(())
    }

    async fn redraw(&self) {
        let snapshot = self.app.snapshot().await;
        println!();
        println!(
            "{}",
            view::render(&snapshot, &self.patient_form, &self.observation_form)
        );
        println!("{}", hint_line(&snapshot));
    }

    /// Handle one command line. Returns false to exit the loop.
    async fn handle(&mut self, line: &str) -> bool {
        let snapshot = self.app.snapshot().await;
        let (command, rest) = split_command(line);

        match command {
            "" => {}
            "quit" | "q" | "exit" => return false,
            "help" => print_help(),
            "reload" => self.app.dispatch(Action::ReloadPatients).await,
            "select" => match resolve_patient_id(&snapshot, rest) {
                Some(patient_id) => {
                    self.app.dispatch(Action::SelectPatient { patient_id }).await;
                }
                None => println!("  Usage: select <number from the roster>"),
            },
            "add" => {
                self.patient_form.clear();
                self.app.dispatch(Action::OpenAddPatient).await;
            }
            "obs" => {
                self.observation_form.clear();
                self.app.dispatch(Action::OpenObservationModal).await;
            }
            "back" => {
                let action = match snapshot.mode {
                    ViewMode::Add => Action::CancelAddPatient,
                    _ => Action::BackToList,
                };
                self.app.dispatch(action).await;
            }
            "cancel" => {
                let action = if snapshot.observation_modal_open {
                    Action::CloseObservationModal
                } else {
                    Action::CancelAddPatient
                };
                self.app.dispatch(action).await;
            }
            "set" => self.set_field(&snapshot, rest),
            "submit" => self.submit(&snapshot).await,
            other => println!("  Unknown command: {other} (try 'help')"),
        }
        true
    }

    /// `set <field> <value>` against whichever form is on screen.
    fn set_field(&mut self, snapshot: &ViewState, rest: &str) {
        let (field, value) = split_command(rest);
        if field.is_empty() {
            println!("  Usage: set <field> <value>");
            return;
        }

        let result = if snapshot.observation_modal_open {
            self.observation_form.set(field, value)
        } else if snapshot.mode == ViewMode::Add {
            self.patient_form.set(field, value)
        } else {
            println!("  No form is open.");
            return;
        };

        if let Err(e) = result {
            println!("  ! {e}");
        }
    }

    /// Validate and submit whichever form is on screen. The form is cleared
    /// only once the state machine has actually left it (success path).
    async fn submit(&mut self, snapshot: &ViewState) {
        if snapshot.observation_modal_open {
            match self.observation_form.to_record() {
                Ok(record) => {
                    self.app.dispatch(Action::SubmitObservation { record }).await;
                    if !self.app.snapshot().await.observation_modal_open {
                        self.observation_form.clear();
                    }
                }
                Err(e) => println!("  ! {e}"),
            }
        } else if snapshot.mode == ViewMode::Add {
            match self.patient_form.to_record() {
                Ok(record) => {
                    self.app.dispatch(Action::SubmitPatient { record }).await;
                    if self.app.snapshot().await.mode == ViewMode::List {
                        self.patient_form.clear();
                    }
                }
                Err(e) => println!("  ! {e}"),
            }
        } else {
            println!("  Nothing to submit here.");
        }
    }
}

/// First whitespace-separated token and the remainder.
fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim()),
        None => (line, ""),
    }
}

/// Resolve a roster number (as displayed) or a raw id to a patient id.
fn resolve_patient_id(snapshot: &ViewState, token: &str) -> Option<String> {
    if token.is_empty() {
        return None;
    }
    if let Ok(number) = token.parse::<usize>() {
        if number >= 1 {
            if let Some(patient) = snapshot.patients.get(number - 1) {
                return Some(patient.id.clone());
            }
        }
        return None;
    }
    snapshot
        .patients
        .iter()
        .find(|patient| patient.id == token)
        .map(|patient| patient.id.clone())
}

fn hint_line(snapshot: &ViewState) -> String {
    if snapshot.loading {
        return String::new();
    }
    if snapshot.observation_modal_open || snapshot.mode == ViewMode::Add {
        return "[ set <field> <value> | submit | cancel ]".to_string();
    }
    match snapshot.mode {
        ViewMode::Detail => "[ obs | back | quit ]".to_string(),
        _ => "[ select <n> | add | reload | quit ]".to_string(),
    }
}

fn print_help() {
    println!("  select <n>          open the n-th patient from the roster");
    println!("  add                 open the add-patient form");
    println!("  obs                 open the add-observation modal (detail view)");
    println!("  set <field> <value> fill a form field");
    println!("  submit              submit the open form");
    println!("  cancel              close the open form or modal");
    println!("  back                return to the roster");
    println!("  reload              refetch the roster");
    println!("  quit                exit");
}
