//! Interactive session: one dispatcher, one cookie jar, many actions
//!
//! ```text
//! filedesk> login ada
//! Password: ********
//! → /dashboard
//! filedesk> upload "./q3 report.pdf"
//! ! File uploaded successfully
//! filedesk> files
//! q3_report.pdf  Type  Created  Modified
//! ```

use anyhow::{anyhow, Result};
use filedesk_core::{Backend, Dispatcher, Notifier, SelectedFile};
use inquire::{InquireError, Text};

use crate::terminal;

const HELP: &str = "\
commands:
  show <form>                 show one form (loginForm, signupForm, uploadForm, filesForm)
  forms                       list forms and which one is visible
  login <user> [password]     log in (password is prompted when omitted)
  signup <user> [password]    create an account
  select [path]               choose the file to upload (no path clears it)
  upload [path]               upload the selected file, or <path>
  rename <file>               rename a file (prompts for the new name)
  delete <file>               delete a file (not supported by the server yet)
  logout                      end the session
  files                       list uploaded files
  html                        print the file table markup
  status                      show location, controls and uploaded names
  help                        this text
  quit                        leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Show(String),
    Forms,
    Login {
        username: String,
        password: Option<String>,
    },
    Signup {
        username: String,
        password: Option<String>,
    },
    Select(Option<String>),
    Upload(Option<String>),
    Rename(String),
    Delete(String),
    Logout,
    Files,
    Html,
    Status,
    Help,
    Quit,
}

impl ShellCommand {
    /// Parse one already tokenised line
    pub fn parse(words: &[String]) -> Result<Option<Self>> {
        let Some((command, args)) = words.split_first() else {
            return Ok(None);
        };
        let arg = |i: usize| args.get(i).cloned();
        let required = |what: &str| {
            arg(0).ok_or_else(|| anyhow!("usage: {} <{}>", command, what))
        };

        let parsed = match command.as_str() {
            "show" => Self::Show(required("form")?),
            "forms" => Self::Forms,
            "login" => Self::Login {
                username: required("username")?,
                password: arg(1),
            },
            "signup" => Self::Signup {
                username: required("username")?,
                password: arg(1),
            },
            "select" => Self::Select(arg(0)),
            "upload" => Self::Upload(arg(0)),
            "rename" | "edit" => Self::Rename(required("file")?),
            "delete" => Self::Delete(required("file")?),
            "logout" => Self::Logout,
            "files" | "ls" => Self::Files,
            "html" => Self::Html,
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(anyhow!("unknown command '{}' (try 'help')", other)),
        };
        Ok(Some(parsed))
    }
}

/// Run one command against the dispatcher, printing what changed
pub async fn execute<B: Backend, N: Notifier>(
    dispatcher: &Dispatcher<B, N>,
    command: ShellCommand,
) -> Result<()> {
    let location_before = dispatcher.page().location;

    match command {
        ShellCommand::Show(form) => {
            dispatcher.switch_form(&form);
            print_forms(dispatcher);
        }
        ShellCommand::Forms => print_forms(dispatcher),
        ShellCommand::Login { username, password } => {
            dispatcher.set_login_fields(&username, password.as_deref().unwrap_or_default());
            dispatcher.login().await;
        }
        ShellCommand::Signup { username, password } => {
            dispatcher.set_signup_fields(&username, password.as_deref().unwrap_or_default());
            dispatcher.signup().await;
        }
        ShellCommand::Select(path) => {
            let file = path.map(SelectedFile::from_path).transpose()?;
            match &file {
                Some(file) => println!("selected {}", file.path.display()),
                None => println!("selection cleared"),
            }
            dispatcher.select_file(file);
        }
        ShellCommand::Upload(path) => {
            if let Some(path) = path {
                dispatcher.select_file(Some(SelectedFile::from_path(path)?));
            }
            dispatcher.upload_file().await;
        }
        ShellCommand::Rename(file) => {
            dispatcher.edit_file(&file).await;
        }
        ShellCommand::Delete(file) => dispatcher.delete_file(&file),
        ShellCommand::Logout => {
            dispatcher.logout().await;
        }
        ShellCommand::Files => {
            let page = dispatcher.page();
            if page.rows().is_empty() {
                println!("(no files)");
            }
            for row in page.rows() {
                println!(
                    "{}  {}  {}  {}",
                    row.filename, row.file_type, row.created, row.modified
                );
            }
        }
        ShellCommand::Html => match dispatcher.page().file_table {
            Some(table) => println!("{}", table.to_html()),
            None => println!("(no file table on this page)"),
        },
        ShellCommand::Status => {
            let page = dispatcher.page();
            println!("location: {}", page.location);
            println!("visible:  {}", page.visible_forms().join(", "));
            println!(
                "upload:   {}{}",
                if page.upload_enabled { "enabled" } else { "disabled" },
                page.file_input
                    .as_ref()
                    .map(|f| format!(" ({} selected)", f.name))
                    .unwrap_or_default()
            );
            println!("uploaded: {}", dispatcher.uploaded_files().join(", "));
        }
        ShellCommand::Help => println!("{}", HELP),
        ShellCommand::Quit => {}
    }

    let location = dispatcher.page().location;
    if location != location_before {
        println!("→ {}", location);
    }
    Ok(())
}

fn print_forms<B: Backend, N: Notifier>(dispatcher: &Dispatcher<B, N>) {
    for form in dispatcher.page().forms {
        let marker = if form.visible { "*" } else { " " };
        println!("{} {}", marker, form.id);
    }
}

/// Read-eval loop until `quit` or end of input
pub async fn run_shell<B: Backend, N: Notifier>(dispatcher: &Dispatcher<B, N>) -> Result<()> {
    let interactive = terminal::is_interactive();
    if interactive {
        println!("filedesk shell, type 'help' for commands");
    }

    loop {
        let line = if interactive {
            match Text::new("filedesk>").prompt() {
                Ok(line) => line,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
                Err(err) => return Err(err.into()),
            }
        } else {
            match terminal::read_line() {
                Some(line) => line,
                None => break,
            }
        };

        let Some(words) = shlex::split(&line) else {
            println!("error: unbalanced quotes");
            continue;
        };

        let command = match ShellCommand::parse(&words) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("error: {}", err);
                continue;
            }
        };
        if command == ShellCommand::Quit {
            break;
        }

        if let Err(err) = execute(dispatcher, with_password(command)).await {
            println!("error: {:#}", err);
        }
    }

    Ok(())
}

/// Ask for the password of login/signup when the line left it out
fn with_password(command: ShellCommand) -> ShellCommand {
    match command {
        ShellCommand::Login {
            username,
            password: None,
        } => ShellCommand::Login {
            password: terminal::read_secret("Password:"),
            username,
        },
        ShellCommand::Signup {
            username,
            password: None,
        } => ShellCommand::Signup {
            password: terminal::read_secret("Password:"),
            username,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filedesk_core::page::{FileRow, UPLOAD_FORM};
    use filedesk_core::testing::{Call, MockBackend, RecordingNotifier, Reply};
    use filedesk_core::{AuthResponse, UiConfig, UploadResponse};

    fn words(line: &str) -> Vec<String> {
        shlex::split(line).unwrap()
    }

    fn dispatcher(backend: MockBackend) -> Dispatcher<MockBackend, RecordingNotifier> {
        Dispatcher::new(backend, RecordingNotifier::new(), UiConfig::default())
    }

    #[test]
    fn parses_quoted_paths() {
        let parsed = ShellCommand::parse(&words(r#"upload "./q3 report.pdf""#)).unwrap();
        assert_eq!(
            parsed,
            Some(ShellCommand::Upload(Some("./q3 report.pdf".to_string())))
        );
    }

    #[test]
    fn parses_optional_password() {
        let parsed = ShellCommand::parse(&words("login ada")).unwrap();
        assert_eq!(
            parsed,
            Some(ShellCommand::Login {
                username: "ada".into(),
                password: None
            })
        );
    }

    #[test]
    fn missing_argument_is_a_usage_error() {
        let err = ShellCommand::parse(&words("rename")).unwrap_err();
        assert_eq!(err.to_string(), "usage: rename <file>");
    }

    #[test]
    fn blank_line_is_nothing() {
        assert_eq!(ShellCommand::parse(&[]).unwrap(), None);
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(ShellCommand::parse(&words("frobnicate")).is_err());
    }

    #[tokio::test]
    async fn show_switches_forms() {
        let d = dispatcher(MockBackend::new());
        execute(&d, ShellCommand::Show(UPLOAD_FORM.into())).await.unwrap();
        assert_eq!(d.page().visible_forms(), vec![UPLOAD_FORM]);
    }

    #[tokio::test]
    async fn login_then_upload_through_the_shell() {
        let d = dispatcher(
            MockBackend::new()
                .reply(Reply::Auth(AuthResponse::accepted()))
                .reply(Reply::Upload(UploadResponse::stored("a.txt"))),
        );

        execute(
            &d,
            ShellCommand::Login {
                username: "ada".into(),
                password: Some("pw".into()),
            },
        )
        .await
        .unwrap();
        execute(&d, ShellCommand::Upload(Some("/tmp/a.txt".into())))
            .await
            .unwrap();

        assert_eq!(d.page().location, "/dashboard");
        assert_eq!(d.page().rows(), &[FileRow::uploaded("a.txt")]);
        assert_eq!(
            d.backend().calls(),
            vec![Call::Login("ada".into()), Call::Upload("a.txt".into())]
        );
    }

    #[tokio::test]
    async fn upload_without_selection_sends_nothing() {
        let d = dispatcher(MockBackend::new());
        execute(&d, ShellCommand::Upload(None)).await.unwrap();
        assert!(d.backend().calls().is_empty());
    }
}
