use crate::cli::Command;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::model::{Field, FieldType, Form, FormPatch};
use crate::persist::{Autosaver, FileStorage, Persister, SharedStorage, SubmissionLog};
use crate::share::{copy_to_clipboard, share_url};
use crate::state::{StateError, Store};
use log::*;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::Arc;

/// Oversees configuration, the store, and its persistence while a command
/// runs.
///
pub struct App {
    config: Config,
    store: Store,
    submissions: SubmissionLog,
    autosaver: Option<Autosaver>,
}

impl App {
    /// Open the configured data directory, run one command against it, and
    /// make sure every change is persisted before returning.
    ///
    pub async fn start(config: Config, command: Command) -> AppResult<()> {
        info!("Starting application...");
        let data_dir = config.data_dir()?;
        debug!("Using data directory {}", data_dir.display());
        let storage: SharedStorage = Arc::new(FileStorage::new(data_dir));
        let mut app = if config.autosave_delay_ms > 0 {
            App::open_with_autosave(config, storage)
        } else {
            App::open(config, storage)
        };
        let result = app.run(command, &mut io::stdout());
        app.close().await;
        info!("Exiting application...");
        result
    }

    /// Hydrate a store from `storage`, writing every change straight back.
    ///
    pub fn open(config: Config, storage: SharedStorage) -> App {
        let persister = Persister::new(Arc::clone(&storage));
        let mut store = App::hydrated_store(&config, &persister);
        store.subscribe(persister);
        App {
            config,
            store,
            submissions: SubmissionLog::new(storage),
            autosaver: None,
        }
    }

    /// Hydrate a store from `storage`, writing changes once edits pause. Must
    /// be called from within a tokio runtime.
    ///
    pub fn open_with_autosave(config: Config, storage: SharedStorage) -> App {
        let persister = Persister::new(Arc::clone(&storage));
        let mut store = App::hydrated_store(&config, &persister);
        let autosaver = Autosaver::spawn(persister, config.autosave_delay());
        store.subscribe(autosaver.subscriber());
        App {
            config,
            store,
            submissions: SubmissionLog::new(storage),
            autosaver: Some(autosaver),
        }
    }

    fn hydrated_store(config: &Config, persister: &Persister) -> Store {
        let store = Store::new(persister.hydrate()).with_reorder_policy(config.reorder_policy);
        debug!("Store hydrated with {} form(s)", store.forms().len());
        store
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Flush pending writes.
    ///
    pub async fn close(self) {
        let App {
            store, autosaver, ..
        } = self;
        drop(store);
        if let Some(autosaver) = autosaver {
            autosaver.flush().await;
        }
    }

    /// Run a single command, writing its report to `out`.
    ///
    pub fn run(&mut self, command: Command, out: &mut dyn Write) -> AppResult<()> {
        debug!("Running command {:?}", command);
        match command {
            Command::List => self.list(out)?,
            Command::Create { title, description } => {
                let id = self.store.create_form(title, description);
                writeln!(out, "Created form {}", id)?;
                writeln!(out, "{}", share_url(&self.config.origin, &id))?;
            }
            Command::Show { id } => {
                let form = self.resolve_form(id.as_deref())?;
                write_form(out, form)?;
            }
            Command::Select { id } => match id {
                Some(id) => {
                    self.require_form(&id)?;
                    self.store.set_current_form(Some(&id));
                    writeln!(out, "Current form is now {}", id)?;
                }
                None => {
                    self.store.set_current_form(None);
                    writeln!(out, "No form selected")?;
                }
            },
            Command::Rename {
                id,
                title,
                description,
            } => {
                self.require_form(&id)?;
                let patch = FormPatch {
                    title,
                    description,
                    fields: None,
                };
                if patch.is_empty() {
                    return Err(AppError::Input("nothing to change".to_string()));
                }
                self.store.update_form(&id, patch)?;
                writeln!(out, "Updated form {}", id)?;
            }
            Command::Delete { id } => {
                self.require_form(&id)?;
                self.store.delete_form(&id);
                writeln!(out, "Deleted form {}", id)?;
            }
            Command::AddField(field) => {
                let field_id = self
                    .store
                    .add_field(field)?
                    .ok_or(StateError::NoCurrentForm)?;
                writeln!(out, "Added field {}", field_id)?;
            }
            Command::EditField { field_id, patch } => {
                self.require_field(&field_id)?;
                if patch.is_empty() {
                    return Err(AppError::Input("nothing to change".to_string()));
                }
                self.store.update_field(&field_id, patch)?;
                writeln!(out, "Updated field {}", field_id)?;
            }
            Command::RemoveField { field_id } => {
                self.require_field(&field_id)?;
                self.store.delete_field(&field_id);
                writeln!(out, "Removed field {}", field_id)?;
            }
            Command::Reorder { order } => {
                self.resolve_form(None)?;
                self.store.reorder_fields(order);
                let form = self.resolve_form(None)?;
                writeln!(out, "Field order: {}", form.field_ids().join(", "))?;
            }
            Command::Share { id, copy } => {
                let form = self.resolve_form(id.as_deref())?;
                let url = share_url(&self.config.origin, &form.id);
                writeln!(out, "{}", url)?;
                if copy {
                    match copy_to_clipboard(&url) {
                        Ok(()) => writeln!(out, "Link copied to clipboard")?,
                        Err(e) => {
                            warn!("{}", e);
                            writeln!(out, "Could not copy link: {}", e)?;
                        }
                    }
                }
            }
            Command::Submit { id, values } => {
                let form = self.resolve_form(Some(&id))?;
                let data = submission_data(form, values)?;
                let submission = self.submissions.record(&id, data)?;
                writeln!(out, "Recorded submission {}", submission.id)?;
            }
            Command::Submissions { id } => {
                self.require_form(&id)?;
                let submissions = self.submissions.for_form(&id);
                if submissions.is_empty() {
                    writeln!(out, "No submissions yet")?;
                }
                for submission in submissions {
                    let data = serde_json::to_string(&submission.data)
                        .map_err(|e| AppError::Input(e.to_string()))?;
                    writeln!(
                        out,
                        "{}  {}  {}",
                        submission.id,
                        submission.submitted_at.format("%Y-%m-%d %H:%M:%S"),
                        data
                    )?;
                }
            }
        }
        Ok(())
    }

    fn list(&self, out: &mut dyn Write) -> AppResult<()> {
        let mut forms: Vec<&Form> = self.store.forms().values().collect();
        if forms.is_empty() {
            writeln!(out, "No forms yet")?;
            return Ok(());
        }
        forms.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        let current = self.store.state().current_form_id();
        for form in forms {
            let marker = if Some(form.id.as_str()) == current { "*" } else { " " };
            writeln!(
                out,
                "{} {}  {}  {} field(s)  updated {}",
                marker,
                form.id,
                form.title,
                form.fields.len(),
                form.updated_at.format("%Y-%m-%d %H:%M")
            )?;
        }
        Ok(())
    }

    fn require_form(&self, id: &str) -> Result<&Form, StateError> {
        self.store
            .form(id)
            .ok_or_else(|| StateError::FormNotFound { id: id.to_string() })
    }

    /// The form with the given id, or the current form when none is given.
    ///
    fn resolve_form(&self, id: Option<&str>) -> Result<&Form, StateError> {
        match id {
            Some(id) => self.require_form(id),
            None => self.store.current_form().ok_or(StateError::NoCurrentForm),
        }
    }

    fn require_field(&self, field_id: &str) -> Result<&Field, StateError> {
        self.resolve_form(None)?
            .field(field_id)
            .ok_or_else(|| StateError::FieldNotFound {
                id: field_id.to_string(),
            })
    }
}

fn write_form(out: &mut dyn Write, form: &Form) -> io::Result<()> {
    writeln!(out, "{} ({})", form.title, form.id)?;
    if !form.description.is_empty() {
        writeln!(out, "{}", form.description)?;
    }
    writeln!(
        out,
        "created {}  updated {}",
        form.created_at.format("%Y-%m-%d %H:%M:%S"),
        form.updated_at.format("%Y-%m-%d %H:%M:%S")
    )?;
    if form.fields.is_empty() {
        writeln!(out, "No fields yet")?;
    }
    for (index, field) in form.fields.iter().enumerate() {
        let required = if field.required { " *" } else { "" };
        writeln!(
            out,
            "{:>2}. [{}] {} ({}){}",
            index + 1,
            field.id,
            field.label,
            field.field_type,
            required
        )?;
        if let Some(options) = &field.options {
            writeln!(out, "      options: {}", options.join(" | "))?;
        }
        if let Some(placeholder) = &field.placeholder {
            writeln!(out, "      placeholder: {}", placeholder)?;
        }
        if let Some(default_value) = &field.default_value {
            writeln!(out, "      default: {}", default_value)?;
        }
        if let Some(help_text) = &field.help_text {
            writeln!(out, "      help: {}", help_text)?;
        }
    }
    Ok(())
}

/// Key entered values by field id. Keys may name a field by id or by label
/// (ignoring case). Checkbox values are split on commas and number values
/// are stored as numbers when they parse.
///
fn submission_data(
    form: &Form,
    values: Vec<(String, String)>,
) -> AppResult<BTreeMap<String, serde_json::Value>> {
    let mut data = BTreeMap::new();
    for (key, raw) in values {
        let field = form
            .field(&key)
            .or_else(|| {
                form.fields
                    .iter()
                    .find(|field| field.label.eq_ignore_ascii_case(&key))
            })
            .ok_or(StateError::FieldNotFound { id: key })?;
        let value = match field.field_type {
            FieldType::Checkbox => serde_json::Value::Array(
                raw.split(',')
                    .map(|choice| choice.trim())
                    .filter(|choice| !choice.is_empty())
                    .map(|choice| serde_json::Value::String(choice.to_string()))
                    .collect(),
            ),
            FieldType::Number => {
                let number = raw
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64);
                match number {
                    Some(number) => serde_json::Value::Number(number),
                    None => serde_json::Value::String(raw),
                }
            }
            _ => serde_json::Value::String(raw),
        };
        data.insert(field.id.clone(), value);
    }
    Ok(data)
}
