//! Saved nickname (`memory.txt`).

use std::io;
use std::path::{Path, PathBuf};

use crate::prompt::{Prompt, ask_non_empty};

/// Single-line nickname file.
pub struct NicknameStore {
    path: PathBuf,
}

impl NicknameStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the saved nickname, if the file holds a non-blank one.
    pub fn load(&self) -> Option<String> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        let nickname = content.trim();
        (!nickname.is_empty()).then(|| nickname.to_string())
    }

    pub fn save(&self, nickname: &str) -> io::Result<()> {
        std::fs::write(&self.path, nickname)
    }
}

/// Returns the saved nickname or asks for one and saves it.
///
/// A nickname that cannot be saved is still used for this run.
pub fn resolve(store: &NicknameStore, prompt: &mut dyn Prompt) -> io::Result<String> {
    if let Some(nickname) = store.load() {
        let message = format!("Используется сохранённый ник: {nickname}");
        prompt.say(&message);
        tracing::info!("{message}");
        return Ok(nickname);
    }

    let nickname = ask_non_empty(prompt, "Введите ваш ник: ")?;
    match store.save(&nickname) {
        Ok(()) => tracing::info!("Ник сохранён: {nickname}"),
        Err(e) => tracing::warn!(
            path = %store.path().display(),
            error = %e,
            "Не удалось сохранить ник"
        ),
    }
    Ok(nickname)
}
