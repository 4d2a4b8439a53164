/// The external command vocabulary: everything buttons, keys, and forms
/// can ask of the stage. No UI semantics leak past this boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Change the selection cursor.
    Select { index: usize },
    /// Flip the avatar's facing.
    SetDirection { left: bool },
    /// Set a named animation on the avatar track.
    Play { animation: String, looped: bool },
    /// Clear the avatar track.
    StopAnimation,
    /// Glide the selected figure to a stage position, in pixels.
    MoveTo { x: f32, y: f32 },
    /// One-shot jump for the selected figure.
    Jump,
}

/// A queue of pending commands.
/// The host pushes between frames; the stage drains once per update.
pub struct CommandQueue {
    commands: Vec<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(16),
        }
    }

    /// Push a new command (called from the host bridge).
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Drain all pending commands, clearing the queue.
    pub fn drain(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// Iterate over pending commands without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}
