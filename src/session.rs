use crate::error::Result;
use crate::fingerprint::Fingerprinter;
use crate::index::{MediaIndex, build_index};
use crate::media::MediaKind;
use crate::prompt::Prompt;
use crate::removal::{RemovalReport, remove_duplicates_and_prune};
use crate::resolve::{count_duplicates, resolve_groups};
use log::info;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Only this word confirms a removal. Case is ignored, but the answer must
/// otherwise match exactly: surrounding spaces are not trimmed.
pub const CONFIRMATION_WORD: &str = "yes";

const MENU: &str = "What do you want to do?
1. Show image duplicates
2. Show video duplicates
3. Delete image and video duplicates
4. Locate image and video duplicates
5. Quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ShowImages,
    ShowVideos,
    RemoveAll,
    ShowAll,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid option: {0:?}")]
pub struct InvalidMenuChoice(pub String);

impl FromStr for MenuChoice {
    type Err = InvalidMenuChoice;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(MenuChoice::ShowImages),
            "2" => Ok(MenuChoice::ShowVideos),
            "3" => Ok(MenuChoice::RemoveAll),
            "4" => Ok(MenuChoice::ShowAll),
            "5" => Ok(MenuChoice::Quit),
            other => Err(InvalidMenuChoice(other.to_string())),
        }
    }
}

#[derive(Debug)]
pub enum SessionOutcome {
    NoDuplicates,
    Quit,
    Cancelled,
    Removed(RemovalReport),
}

/// The interactive loop: rescan, show the menu, act, repeat.
pub struct Session<'a, P, W> {
    root: PathBuf,
    fingerprinter: &'a dyn Fingerprinter,
    prompt: P,
    out: W,
}

impl<'a, P: Prompt, W: Write> Session<'a, P, W> {
    pub fn new(root: &Path, fingerprinter: &'a dyn Fingerprinter, prompt: P, out: W) -> Self {
        Self {
            root: root.to_path_buf(),
            fingerprinter,
            prompt,
            out,
        }
    }

    pub fn run(&mut self) -> Result<SessionOutcome> {
        loop {
            let index = build_index(&self.root, self.fingerprinter)?;
            let count = count_duplicates(&index);
            writeln!(self.out, "Duplicates found: {}", count)?;

            if count == 0 {
                writeln!(self.out, "No duplicates found.")?;
                return Ok(SessionOutcome::NoDuplicates);
            }

            let Some(choice) = self.read_choice()? else {
                writeln!(self.out, "Goodbye.")?;
                return Ok(SessionOutcome::Quit);
            };

            match choice {
                MenuChoice::ShowImages => self.show_duplicates(&index, &[MediaKind::Image])?,
                MenuChoice::ShowVideos => self.show_duplicates(&index, &[MediaKind::Video])?,
                MenuChoice::ShowAll => self.show_duplicates(&index, &MediaKind::ALL)?,
                MenuChoice::RemoveAll => return self.remove(count),
                MenuChoice::Quit => {
                    writeln!(self.out, "Goodbye.")?;
                    return Ok(SessionOutcome::Quit);
                }
            }
        }
    }

    /// Show the menu until a valid choice comes back. `None` on end of input.
    fn read_choice(&mut self) -> Result<Option<MenuChoice>> {
        loop {
            writeln!(self.out, "{}", MENU)?;
            let Some(answer) = self.prompt.ask("Your choice")? else {
                return Ok(None);
            };
            match answer.parse::<MenuChoice>() {
                Ok(choice) => return Ok(Some(choice)),
                Err(err) => {
                    info!("Rejected menu input: {}", err);
                    writeln!(self.out, "Invalid option.")?;
                }
            }
        }
    }

    fn show_duplicates(&mut self, index: &MediaIndex, kinds: &[MediaKind]) -> Result<()> {
        let mut shown = false;
        for resolved in resolve_groups(index, kinds) {
            shown = true;
            writeln!(self.out, "[ORIGINAL] {}", resolved.retained.display())?;
            for (n, duplicate) in resolved.duplicates.iter().enumerate() {
                writeln!(self.out, "  [Doublon {}] : {}", n + 1, duplicate.display())?;
            }
            writeln!(self.out)?;
        }
        if !shown {
            match kinds {
                [kind] => writeln!(self.out, "No {} duplicates found.", kind)?,
                _ => writeln!(self.out, "No duplicates found.")?,
            }
        }
        Ok(())
    }

    fn remove(&mut self, count: usize) -> Result<SessionOutcome> {
        writeln!(self.out, "Total duplicates to delete: {}", count)?;
        let question = format!(
            "Warning! This deletes every image and video duplicate under {}. Continue? ({}/no)",
            self.root.display(),
            CONFIRMATION_WORD
        );
        let confirmed = self
            .prompt
            .ask(&question)?
            .is_some_and(|answer| answer.eq_ignore_ascii_case(CONFIRMATION_WORD));

        if !confirmed {
            writeln!(self.out, "Removal cancelled.")?;
            return Ok(SessionOutcome::Cancelled);
        }

        let report = remove_duplicates_and_prune(&self.root, self.fingerprinter)?;
        for path in &report.removed {
            writeln!(self.out, "🗑️  Deleted {}", path.display())?;
        }
        for failure in &report.failed {
            writeln!(
                self.out,
                "⚠️  Could not delete {}: {}",
                failure.path.display(),
                failure.error
            )?;
        }
        for dir in &report.pruned {
            writeln!(self.out, "🧹 Removed empty directory {}", dir.display())?;
        }
        writeln!(
            self.out,
            "✅ {} duplicates were deleted.",
            report.removed_count()
        )?;
        Ok(SessionOutcome::Removed(report))
    }
}
