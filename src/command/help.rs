//! Help text rendering
//!
//! A command may rewrite its help text before it is printed and may listen
//! for its help having been printed.

use crate::command::Command;
use std::fmt;
use std::mem;

const HELP_FLAGS: &str = "-h, --help";

/// Rewrites rendered help text before it is shown
pub type HelpTransform = Box<dyn Fn(String) -> String>;

/// Called with the command after its help was printed
pub type HelpListener = Box<dyn FnMut(&Command)>;

#[derive(Default)]
pub(crate) struct HelpHooks {
    pub transform: Option<HelpTransform>,
    pub listener: Option<HelpListener>,
    /// Help for this command is the outcome of the current parse
    pub requested: bool,
}

impl fmt::Debug for HelpHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelpHooks")
            .field("transform", &self.transform.is_some())
            .field("listener", &self.listener.is_some())
            .field("requested", &self.requested)
            .finish()
    }
}

fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}

/// Prefix every line with two spaces
fn indent(text: &str) -> String {
    text.lines().map(|line| format!("  {}", line)).collect::<Vec<_>>().join("\n")
}

impl Command {
    /// `[options] [command] <args>` unless a custom usage was set
    pub fn usage_line(&self) -> String {
        if let Some(usage) = &self.usage {
            return usage.clone();
        }
        let mut usage = String::from("[options]");
        if !self.commands.is_empty() {
            usage.push_str(" [command]");
        }
        if !self.slots.is_empty() {
            let args: Vec<String> = self.slots.iter().map(|slot| slot.human_readable()).collect();
            usage.push(' ');
            usage.push_str(&args.join(" "));
        }
        usage
    }

    /// Label and description for each listed child
    fn command_rows(&self) -> Vec<(String, Option<&str>)> {
        self.commands
            .iter()
            .filter(|cmd| !cmd.hidden)
            .map(|cmd| {
                let mut label = cmd.name.clone();
                if let Some(alias) = &cmd.alias {
                    label.push('|');
                    label.push_str(alias);
                }
                if !cmd.options.is_empty() {
                    label.push_str(" [options]");
                }
                let args: Vec<String> = cmd.slots.iter().map(|slot| slot.human_readable()).collect();
                if !args.is_empty() {
                    label.push(' ');
                    label.push_str(&args.join(" "));
                }
                (label, cmd.description.as_deref())
            })
            .collect()
    }

    fn pad_width(&self) -> usize {
        let mut width = self
            .options
            .iter()
            .map(|opt| opt.flags.len())
            .chain(std::iter::once(HELP_FLAGS.len()))
            .max()
            .unwrap_or(0);

        if !self.args_description.is_empty() && !self.slots.is_empty() {
            let widest_arg = self.slots.iter().map(|slot| slot.name.len()).max().unwrap_or(0);
            width = width.max(widest_arg);
        }
        if !self.commands.is_empty() {
            let widest_cmd = self.command_rows().iter().map(|(label, _)| label.len()).max().unwrap_or(0);
            width = width.max(widest_cmd);
        }
        width
    }

    fn option_help(&self) -> String {
        let width = self.pad_width();
        let mut lines: Vec<String> = self
            .options
            .iter()
            .map(|opt| {
                let mut line = format!("{}  {}", pad(&opt.flags, width), opt.description);
                if opt.bool && opt.preassigns_default() {
                    if let Some(default) = &opt.default {
                        line.push_str(&format!(" (default: {})", default.to_json()));
                    }
                }
                line
            })
            .collect();
        lines.push(format!("{}  output usage information", pad(HELP_FLAGS, width)));
        lines.join("\n")
    }

    fn command_help(&self) -> Option<String> {
        if self.commands.is_empty() {
            return None;
        }
        let width = self.pad_width();
        let rows: Vec<String> = self
            .command_rows()
            .into_iter()
            .map(|(label, desc)| match desc {
                Some(desc) if !desc.is_empty() => format!("{}  {}", pad(&label, width), desc),
                _ => label,
            })
            .collect();
        Some(["Commands:".to_string(), indent(&rows.join("\n")), String::new()].join("\n"))
    }

    /// Render the full help text
    pub fn help_information(&self) -> String {
        let mut name = self.name.clone();
        if let Some(alias) = &self.alias {
            name.push('|');
            name.push_str(alias);
        }
        let mut parts = vec![format!("Usage: {} {}", name, self.usage_line()), String::new()];

        if let Some(description) = &self.description {
            parts.push(description.clone());
            parts.push(String::new());

            if !self.args_description.is_empty() && !self.slots.is_empty() {
                let width = self.pad_width();
                parts.push("Arguments:".to_string());
                parts.push(String::new());
                for slot in &self.slots {
                    let desc = self
                        .args_description
                        .iter()
                        .find(|(name, _)| *name == slot.name)
                        .map(|(_, desc)| desc.as_str())
                        .unwrap_or_default();
                    parts.push(format!("  {}  {}", pad(&slot.name, width), desc));
                }
                parts.push(String::new());
            }
        }

        parts.push("Options:".to_string());
        parts.push(indent(&self.option_help()));
        parts.push(String::new());

        if let Some(commands) = self.command_help() {
            parts.push(commands);
        }
        parts.join("\n")
    }

    /// Rewrite this command's help text before it is shown
    pub fn help_transform<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(String) -> String + 'static,
    {
        self.help_hooks.transform = Some(Box::new(f));
        self
    }

    /// Run `f` after this command's help has been printed
    pub fn on_help<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut(&Command) + 'static,
    {
        self.help_hooks.listener = Some(Box::new(f));
        self
    }

    /// Help text as it is printed, after the transform if one is set
    pub fn render_help(&self) -> String {
        let text = self.help_information();
        match &self.help_hooks.transform {
            Some(transform) => transform(text),
            None => text,
        }
    }

    /// Print the help text to stdout and notify the help listener
    pub fn output_help(&mut self) {
        print!("{}", self.render_help());
        self.notify_help_listener();
    }

    /// Render help as the outcome of a parse, remembering which command it belongs to
    pub(crate) fn take_help_request(&mut self) -> String {
        self.help_hooks.requested = true;
        self.render_help()
    }

    /// Notify the listener of the command whose help a parse produced
    pub(crate) fn notify_requested_help(&mut self) -> bool {
        if mem::take(&mut self.help_hooks.requested) {
            self.notify_help_listener();
            return true;
        }
        self.commands.iter_mut().any(Command::notify_requested_help)
    }

    pub(crate) fn clear_help_requests(&mut self) {
        self.help_hooks.requested = false;
        self.commands.iter_mut().for_each(Command::clear_help_requests);
    }

    fn notify_help_listener(&mut self) {
        if let Some(mut listener) = self.help_hooks.listener.take() {
            listener(self);
            self.help_hooks.listener = Some(listener);
        }
    }
}
