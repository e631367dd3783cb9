//! The report run: gather, ask, upload, send.

use std::path::Path;

use anyhow::Context;
use ncbugreport_client::{ClientLayout, FML_LOG, LATEST_LOG};
use ncbugreport_mclogs::{Client, UploadOutcome};
use ncbugreport_webhook::{BugReport, Notifier};

use crate::config::Config;
use crate::nickname::{self, NicknameStore};
use crate::prompt::{Prompt, ask_non_empty};
use crate::select::select_version;

const NO_CRASH_REPORT: &str = "Краш-репорт не найден.";

const DESCRIPTION_PROMPT: &str = "Пожалуйста, опишите проблему максимально подробно. Расскажите, что вы делали и что произошло. > ";

/// Collects a report and delivers it to the webhook.
pub async fn run(config: &Config, prompt: &mut dyn Prompt) -> anyhow::Result<()> {
    let report = collect(config, prompt).await?;
    submit(config, &report, prompt).await
}

/// Gathers PC info, uploads logs and asks the user for the rest.
pub async fn collect(config: &Config, prompt: &mut dyn Prompt) -> anyhow::Result<BugReport> {
    announce(prompt, "Сбор информации о ПК, это может занять несколько секунд...");
    let pc_info = ncbugreport_hardware::inspect(&config.hardware()).await.render();

    let version = select_version(prompt)?;
    tracing::info!("Выбрана версия игры: {version}");

    let layout = ClientLayout::new(&config.app_data_dir(), &config.app_name, version);
    tracing::debug!(dir = %layout.base_dir().display(), "client directory");

    let paste = Client::new()
        .context("failed to create paste client")?
        .with_base_url(config.paste_url.as_str())
        .with_max_size(config.max_upload_bytes);

    announce(prompt, "Загрузка логов на mclo.gs...");
    let latest_log = upload(&paste, prompt, &layout.latest_log(), LATEST_LOG, LATEST_LOG).await;
    let fml_log = upload(&paste, prompt, &layout.fml_log(), FML_LOG, FML_LOG).await;

    let crash_report = match layout.latest_crash_report() {
        Some(path) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            upload(&paste, prompt, &path, &name, "краш-репорт").await
        }
        None => {
            tracing::info!("{NO_CRASH_REPORT}");
            NO_CRASH_REPORT.to_string()
        }
    };

    let store = NicknameStore::new(&config.nickname_file);
    let nickname = nickname::resolve(&store, prompt)?;
    let description = ask_non_empty(prompt, DESCRIPTION_PROMPT)?;

    Ok(BugReport {
        nickname,
        description,
        game_version: version.label().to_string(),
        pc_info,
        latest_log,
        fml_log,
        crash_report,
    })
}

/// Posts the report to the configured webhook.
pub async fn submit(config: &Config, report: &BugReport, prompt: &mut dyn Prompt) -> anyhow::Result<()> {
    let notifier = Notifier::new(&config.webhook_url)?;

    announce(prompt, "Отправка данных в Discord...");
    notifier.send(&report.to_payload()).await?;
    announce(prompt, "Данные успешно отправлены!");
    Ok(())
}

/// Uploads one file and shows the resulting link or failure message.
async fn upload(
    paste: &Client,
    prompt: &mut dyn Prompt,
    path: &Path,
    name: &str,
    label: &str,
) -> String {
    let outcome = paste.upload_file(path, name).await;
    if let UploadOutcome::Failed(failure) = &outcome {
        tracing::debug!(path = %path.display(), ?failure, "log not uploaded");
    }
    let text = outcome.to_string();
    announce(prompt, &format!("Ссылка на {label}: {text}"));
    text
}

/// Shows a progress line and records it in the run log.
fn announce(prompt: &mut dyn Prompt, message: &str) {
    prompt.say(message);
    tracing::info!("{message}");
}
