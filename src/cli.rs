//! Command line parsing.
//!
//! Turns arguments into a `Command` for `App::run`. Form arguments accept
//! either an id or a share link.

use crate::error::{AppError, AppResult};
use crate::model::{FieldPatch, FieldType, NewField};
use crate::share::parse_share_url;
use clap::{App as ClapApp, AppSettings, Arg, ArgMatches, SubCommand};
use std::ffi::OsString;

const FIELD_TYPES: [&str; 8] = [
    "text", "textarea", "dropdown", "checkbox", "radio", "date", "number", "email",
];
const CLEARABLE: [&str; 4] = ["placeholder", "help-text", "options", "default"];

/// Specify the different commands.
///
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Create {
        title: String,
        description: String,
    },
    Show {
        id: Option<String>,
    },
    Select {
        id: Option<String>,
    },
    Rename {
        id: String,
        title: Option<String>,
        description: Option<String>,
    },
    Delete {
        id: String,
    },
    AddField(NewField),
    EditField {
        field_id: String,
        patch: FieldPatch,
    },
    RemoveField {
        field_id: String,
    },
    Reorder {
        order: Vec<String>,
    },
    Share {
        id: Option<String>,
        copy: bool,
    },
    Submit {
        id: String,
        values: Vec<(String, String)>,
    },
    Submissions {
        id: String,
    },
}

/// Parsed invocation: global options plus the command to run.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Cli {
    pub config_dir: Option<String>,
    pub data_dir: Option<String>,
    pub verbosity: u64,
    pub command: Command,
}

fn form_arg(name: &'static str, help: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(name).value_name("FORM").help(help)
}

fn field_definition_args<'a>(cmd: ClapApp<'a, 'a>) -> ClapApp<'a, 'a> {
    cmd.arg(
        Arg::with_name("placeholder")
            .long("placeholder")
            .takes_value(true)
            .help("Placeholder text"),
    )
    .arg(
        Arg::with_name("help-text")
            .long("help-text")
            .takes_value(true)
            .help("Help text shown below the input"),
    )
    .arg(
        Arg::with_name("option")
            .long("option")
            .short("o")
            .takes_value(true)
            .multiple(true)
            .number_of_values(1)
            .help("Choice for dropdown, checkbox, and radio fields (repeatable)"),
    )
    .arg(
        Arg::with_name("default")
            .long("default")
            .takes_value(true)
            .help("Default value"),
    )
}

/// Build the argument parser.
///
pub fn build() -> ClapApp<'static, 'static> {
    ClapApp::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .setting(AppSettings::VersionlessSubcommands)
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("DIR")
                .takes_value(true)
                .global(true)
                .help("Directory holding config.yml"),
        )
        .arg(
            Arg::with_name("data-dir")
                .short("d")
                .long("data-dir")
                .value_name("DIR")
                .takes_value(true)
                .global(true)
                .help("Directory holding persisted forms"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .global(true)
                .help("Log more (repeatable)"),
        )
        .subcommand(SubCommand::with_name("list").about("List all forms"))
        .subcommand(
            SubCommand::with_name("create")
                .about("Create a form and make it current")
                .arg(Arg::with_name("title").required(true))
                .arg(
                    Arg::with_name("description")
                        .short("D")
                        .long("description")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("show")
                .about("Show a form, the current one by default")
                .arg(form_arg("form", "Form id or share link")),
        )
        .subcommand(
            SubCommand::with_name("select")
                .about("Make a form current")
                .arg(form_arg("form", "Form id or share link").required_unless("none"))
                .arg(
                    Arg::with_name("none")
                        .long("none")
                        .conflicts_with("form")
                        .help("Clear the current form"),
                ),
        )
        .subcommand(
            SubCommand::with_name("rename")
                .about("Change a form's title or description")
                .arg(form_arg("form", "Form id or share link").required(true))
                .arg(Arg::with_name("title").long("title").takes_value(true))
                .arg(
                    Arg::with_name("description")
                        .long("description")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("delete")
                .about("Delete a form")
                .arg(form_arg("form", "Form id or share link").required(true)),
        )
        .subcommand(field_definition_args(
            SubCommand::with_name("add-field")
                .about("Append a field to the current form")
                .arg(
                    Arg::with_name("type")
                        .required(true)
                        .possible_values(&FIELD_TYPES),
                )
                .arg(Arg::with_name("label").required(true))
                .arg(
                    Arg::with_name("required")
                        .long("required")
                        .short("r")
                        .help("Mark the field as required"),
                ),
        ))
        .subcommand(field_definition_args(
            SubCommand::with_name("edit-field")
                .about("Change a field of the current form")
                .arg(Arg::with_name("field").required(true).value_name("FIELD_ID"))
                .arg(
                    Arg::with_name("type")
                        .long("type")
                        .takes_value(true)
                        .possible_values(&FIELD_TYPES),
                )
                .arg(Arg::with_name("label").long("label").takes_value(true))
                .arg(
                    Arg::with_name("required")
                        .long("required")
                        .takes_value(true)
                        .possible_values(&["true", "false"]),
                )
                .arg(
                    Arg::with_name("clear")
                        .long("clear")
                        .takes_value(true)
                        .multiple(true)
                        .number_of_values(1)
                        .possible_values(&CLEARABLE)
                        .help("Remove an optional member (repeatable)"),
                ),
        ))
        .subcommand(
            SubCommand::with_name("remove-field")
                .about("Delete a field from the current form")
                .arg(Arg::with_name("field").required(true).value_name("FIELD_ID")),
        )
        .subcommand(
            SubCommand::with_name("reorder")
                .about("Rearrange the current form's fields")
                .arg(
                    Arg::with_name("fields")
                        .value_name("FIELD_ID")
                        .multiple(true)
                        .required(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("share")
                .about("Print the share link of a form, the current one by default")
                .arg(form_arg("form", "Form id or share link"))
                .arg(
                    Arg::with_name("copy")
                        .long("copy")
                        .help("Also copy the link to the clipboard"),
                ),
        )
        .subcommand(
            SubCommand::with_name("submit")
                .about("Record a submission of a form")
                .arg(form_arg("form", "Form id or share link").required(true))
                .arg(
                    Arg::with_name("values")
                        .value_name("FIELD=VALUE")
                        .multiple(true)
                        .help("Field id or label, then the entered value"),
                ),
        )
        .subcommand(
            SubCommand::with_name("submissions")
                .about("List submissions of a form")
                .arg(form_arg("form", "Form id or share link").required(true)),
        )
}

/// Parse the given arguments. Help and version requests surface as errors
/// carrying clap's message.
///
pub fn parse_from<I, T>(args: I) -> AppResult<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build()
        .get_matches_from_safe(args)
        .map_err(|e| AppError::Input(e.message))?;
    Cli::from_matches(&matches)
}

impl Cli {
    pub fn from_matches(matches: &ArgMatches) -> AppResult<Cli> {
        let (name, sub) = matches.subcommand();
        let sub = sub.ok_or_else(|| AppError::Input("missing command".to_string()))?;
        Ok(Cli {
            config_dir: global_value(matches, sub, "config"),
            data_dir: global_value(matches, sub, "data-dir"),
            verbosity: matches
                .occurrences_of("verbose")
                .max(sub.occurrences_of("verbose")),
            command: command(name, sub)?,
        })
    }
}

fn global_value(matches: &ArgMatches, sub: &ArgMatches, name: &str) -> Option<String> {
    sub.value_of(name)
        .or_else(|| matches.value_of(name))
        .map(str::to_string)
}

fn owned(matches: &ArgMatches, name: &str) -> Option<String> {
    matches.value_of(name).map(str::to_string)
}

fn form_id(matches: &ArgMatches) -> AppResult<Option<String>> {
    match matches.value_of("form") {
        Some(raw) => parse_share_url(raw)
            .map(Some)
            .ok_or_else(|| AppError::Input(format!("'{}' is neither a form id nor a share link", raw))),
        None => Ok(None),
    }
}

fn required_form_id(matches: &ArgMatches) -> AppResult<String> {
    form_id(matches)?.ok_or_else(|| AppError::Input("a form is required".to_string()))
}

fn options(matches: &ArgMatches) -> Option<Vec<String>> {
    matches
        .values_of("option")
        .map(|values| values.map(str::to_string).collect())
}

fn command(name: &str, matches: &ArgMatches) -> AppResult<Command> {
    let command = match name {
        "list" => Command::List,
        "create" => Command::Create {
            title: owned(matches, "title").unwrap_or_default(),
            description: owned(matches, "description").unwrap_or_default(),
        },
        "show" => Command::Show {
            id: form_id(matches)?,
        },
        "select" => Command::Select {
            id: form_id(matches)?,
        },
        "rename" => Command::Rename {
            id: required_form_id(matches)?,
            title: owned(matches, "title"),
            description: owned(matches, "description"),
        },
        "delete" => Command::Delete {
            id: required_form_id(matches)?,
        },
        "add-field" => {
            let field_type: FieldType = matches.value_of("type").unwrap_or_default().parse()?;
            let label = owned(matches, "label").unwrap_or_default();
            Command::AddField(NewField {
                placeholder: owned(matches, "placeholder"),
                help_text: owned(matches, "help-text"),
                options: options(matches),
                default_value: owned(matches, "default"),
                ..NewField::new(field_type, label).required(matches.is_present("required"))
            })
        }
        "edit-field" => Command::EditField {
            field_id: owned(matches, "field").unwrap_or_default(),
            patch: field_patch(matches)?,
        },
        "remove-field" => Command::RemoveField {
            field_id: owned(matches, "field").unwrap_or_default(),
        },
        "reorder" => Command::Reorder {
            order: matches
                .values_of("fields")
                .map(|values| values.map(str::to_string).collect())
                .unwrap_or_default(),
        },
        "share" => Command::Share {
            id: form_id(matches)?,
            copy: matches.is_present("copy"),
        },
        "submit" => Command::Submit {
            id: required_form_id(matches)?,
            values: matches
                .values_of("values")
                .map(|values| values.map(split_assignment).collect::<AppResult<Vec<_>>>())
                .transpose()?
                .unwrap_or_default(),
        },
        "submissions" => Command::Submissions {
            id: required_form_id(matches)?,
        },
        other => return Err(AppError::Input(format!("unknown command '{}'", other))),
    };
    Ok(command)
}

fn field_patch(matches: &ArgMatches) -> AppResult<FieldPatch> {
    let field_type = match matches.value_of("type") {
        Some(raw) => Some(raw.parse::<FieldType>()?),
        None => None,
    };
    let mut patch = FieldPatch {
        field_type,
        label: owned(matches, "label"),
        placeholder: owned(matches, "placeholder").map(Some),
        required: matches.value_of("required").map(|raw| raw == "true"),
        help_text: owned(matches, "help-text").map(Some),
        options: options(matches).map(Some),
        default_value: owned(matches, "default").map(Some),
    };
    for member in matches.values_of("clear").into_iter().flatten() {
        match member {
            "placeholder" => patch.placeholder = Some(None),
            "help-text" => patch.help_text = Some(None),
            "options" => patch.options = Some(None),
            "default" => patch.default_value = Some(None),
            _ => {}
        }
    }
    Ok(patch)
}

fn split_assignment(raw: &str) -> AppResult<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(AppError::Input(format!(
            "expected FIELD=VALUE, got '{}'",
            raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["form-builder"];
        full.extend_from_slice(args);
        parse_from(full).unwrap()
    }

    #[test]
    fn parses_create_with_description() {
        let cli = parse(&["create", "Survey", "-D", "desc"]);
        assert_eq!(
            cli.command,
            Command::Create {
                title: "Survey".to_string(),
                description: "desc".to_string(),
            }
        );
    }

    #[test]
    fn parses_global_options_on_either_side() {
        let cli = parse(&["-c", "/tmp/cfg", "list", "-d", "/tmp/data", "-vv"]);
        assert_eq!(cli.config_dir.as_deref(), Some("/tmp/cfg"));
        assert_eq!(cli.data_dir.as_deref(), Some("/tmp/data"));
        assert_eq!(cli.verbosity, 2);
        assert_eq!(cli.command, Command::List);
    }

    #[test]
    fn parses_add_field_with_options() {
        let cli = parse(&[
            "add-field", "radio", "Size", "--required", "-o", "S", "-o", "M", "--help-text", "Pick one",
        ]);
        let expected = NewField::new(FieldType::Radio, "Size")
            .required(true)
            .options(vec!["S", "M"])
            .help_text("Pick one");
        assert_eq!(cli.command, Command::AddField(expected));
    }

    #[test]
    fn rejects_unknown_field_type() {
        assert!(parse_from(vec!["form-builder", "add-field", "slider", "Volume"]).is_err());
    }

    #[test]
    fn parses_edit_field_with_clears() {
        let cli = parse(&[
            "edit-field", "f1", "--label", "Email", "--required", "false", "--clear", "placeholder",
            "--clear", "default",
        ]);
        match cli.command {
            Command::EditField { field_id, patch } => {
                assert_eq!(field_id, "f1");
                assert_eq!(patch.label.as_deref(), Some("Email"));
                assert_eq!(patch.required, Some(false));
                assert_eq!(patch.placeholder, Some(None));
                assert_eq!(patch.default_value, Some(None));
                assert_eq!(patch.help_text, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn form_arguments_accept_share_links() {
        let cli = parse(&["show", "http://localhost:3000/form-viewer/abc123"]);
        assert_eq!(
            cli.command,
            Command::Show {
                id: Some("abc123".to_string())
            }
        );
        assert!(parse_from(vec!["form-builder", "show", "https://x.io/other/abc"]).is_err());
    }

    #[test]
    fn parses_select_none() {
        assert_eq!(parse(&["select", "--none"]).command, Command::Select { id: None });
    }

    #[test]
    fn parses_reorder_and_submit() {
        assert_eq!(
            parse(&["reorder", "f2", "f1"]).command,
            Command::Reorder {
                order: vec!["f2".to_string(), "f1".to_string()]
            }
        );
        assert_eq!(
            parse(&["submit", "abc123", "Name=Ada", "age=36"]).command,
            Command::Submit {
                id: "abc123".to_string(),
                values: vec![
                    ("Name".to_string(), "Ada".to_string()),
                    ("age".to_string(), "36".to_string()),
                ],
            }
        );
        assert!(parse_from(vec!["form-builder", "submit", "abc123", "novalue"]).is_err());
    }

    #[test]
    fn requires_a_command() {
        assert!(parse_from(vec!["form-builder"]).is_err());
    }
}
