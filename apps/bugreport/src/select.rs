//! Game version menu.

use std::io;

use ncbugreport_client::GameVersion;

use crate::prompt::Prompt;

const INVALID_CHOICE: &str = "Некорректный ввод. Пожалуйста, выберите 1 или 2.";

/// Shows the version menu and asks until the answer is `1` or `2`.
pub fn select_version(prompt: &mut dyn Prompt) -> io::Result<GameVersion> {
    prompt.say("Выберите версию игры:");
    for version in GameVersion::all() {
        prompt.say(&format!("{}. {}", version.choice(), version.label()));
    }

    loop {
        let answer = prompt.ask("Введите номер (1 или 2): ")?;
        match answer.parse::<GameVersion>() {
            Ok(version) => return Ok(version),
            Err(_) => prompt.say(INVALID_CHOICE),
        }
    }
}
