use tokio::process::Command;

/// Build a shell invocation of `command` followed by `args`.
///
/// The pieces are joined with spaces and handed to the platform shell, so
/// `command` may itself be a shell snippet such as `"exit 1"`.
pub fn shell_command(command: &str, args: &[String]) -> Command {
    let line = shell_line(command, args);

    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(line);
        cmd
    }
    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(line);
        cmd
    }
}

pub(crate) fn shell_line(command: &str, args: &[String]) -> String {
    std::iter::once(command)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
