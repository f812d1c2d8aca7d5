/// The server-side entity a session drives.
///
/// Calls may arrive after [`close`](Self::close): the session's closed flag is
/// only checked between packets, so implementations must tolerate a trailing
/// `chat` or `execute_command`.
pub trait Controllable: Send + Sync {
    /// Handle a chat line typed by the client.
    fn chat(&self, message: &str);

    /// Run a command line typed by the client. Output is delivered later via
    /// [`Session::send_command_output`](super::Session::send_command_output).
    fn execute_command(&self, command_line: &str);

    /// Release the entity. Errors are logged by the session and otherwise ignored.
    fn close(&self) -> anyhow::Result<()>;
}
