//! # Bot Handlers Module
//!
//! teloxide handlers for the two entry points: commands (`/start`,
//! `/gastos`) and free-form messages (typed expenses or receipt photos).
//! Each update is handled independently; shared immutable state travels
//! in [`BotContext`].
//!
//! Errors from collaborators never escape a handler: they are logged and
//! turned into a fixed Spanish reply so the dispatch loop keeps running.

use anyhow::Result;
use log::{debug, error, info};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::FileId;
use teloxide::utils::command::BotCommands;

use crate::config::BotConfig;
use crate::extractor;
use crate::ledger::ExpenseRecord;
use crate::ocr::TextExtractor;
use crate::query::{self, GastosQuery};
use crate::store::LedgerBackend;

pub const NOT_AUTHORIZED_REPLY: &str = "No autorizado.";
pub const USAGE_REPLY: &str =
    "Uso: /gastos fecha:YYYY-MM-DD o categoria:nombre o desde:YYYY-MM-DD hasta:YYYY-MM-DD";
pub const START_REPLY: &str = "Bot listo. Envía imagen de ticket o texto transcrito. \
    Comandos: /gastos fecha:YYYY-MM-DD, /gastos categoria:nombre, \
    /gastos desde:YYYY-MM-DD hasta:YYYY-MM-DD";
pub const READ_ERROR_REPLY: &str = "Error al leer datos.";
pub const SAVE_ERROR_REPLY: &str = "Error al guardar el gasto.";
pub const IMAGE_ERROR_REPLY: &str = "Error al procesar la imagen.";
pub const NO_EXPENSES_REPLY: &str = "No hay gastos esa fecha.";

/// Supported bot commands.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Comandos soportados:")]
pub enum Command {
    #[command(description = "muestra el uso del bot.")]
    Start,
    #[command(description = "consulta el registro de gastos.")]
    Gastos(String),
}

/// Shared immutable state injected into every handler.
#[derive(Clone)]
pub struct BotContext {
    pub config: Arc<BotConfig>,
    pub store: Arc<dyn LedgerBackend>,
    pub ocr: Arc<dyn TextExtractor>,
}

/// Handle `/start` and `/gastos`.
///
/// Unauthorized chats get the fixed rejection reply. Note the asymmetry
/// with [`message_handler`], which drops unauthorized senders silently.
pub async fn command_handler(
    bot: Bot,
    ctx: BotContext,
    msg: Message,
    cmd: Command,
) -> ResponseResult<()> {
    if !ctx.config.is_authorized(msg.chat.id) {
        info!("Rejected command from unauthorized chat {}", msg.chat.id);
        bot.send_message(msg.chat.id, NOT_AUTHORIZED_REPLY).await?;
        return Ok(());
    }

    match cmd {
        Command::Start => {
            bot.send_message(msg.chat.id, START_REPLY).await?;
        }
        Command::Gastos(args) => {
            handle_gastos(&bot, &ctx, msg.chat.id, &args).await?;
        }
    }

    Ok(())
}

async fn handle_gastos(
    bot: &Bot,
    ctx: &BotContext,
    chat_id: ChatId,
    args: &str,
) -> ResponseResult<()> {
    let parsed = query::parse_query(args);
    if parsed == GastosQuery::Invalid {
        bot.send_message(chat_id, USAGE_REPLY).await?;
        return Ok(());
    }

    // Every query works on a fresh snapshot; there is no local copy.
    let ledger = match ctx.store.read().await {
        Ok((ledger, _sha)) => ledger,
        Err(e) => {
            error!("Failed to fetch ledger for query: {e}");
            bot.send_message(chat_id, READ_ERROR_REPLY).await?;
            return Ok(());
        }
    };

    let reply = match parsed {
        GastosQuery::ByDate(fecha) => {
            let matches = query::expenses_on(&ledger, &fecha);
            if matches.is_empty() {
                NO_EXPENSES_REPLY.to_string()
            } else {
                format_day_report(&fecha, &matches)
            }
        }
        GastosQuery::ByCategory(cat) => {
            format_category_total(&cat, query::total_for_category(&ledger, &cat))
        }
        GastosQuery::ByRange { desde, hasta } => {
            format_range_total(&desde, &hasta, query::total_in_range(&ledger, &desde, &hasta))
        }
        GastosQuery::Invalid => unreachable!("filtered above"),
    };

    bot.send_message(chat_id, reply).await?;
    Ok(())
}

/// Handle free-form messages: receipt photos and typed expense text.
///
/// Unauthorized senders are ignored without a reply.
pub async fn message_handler(bot: Bot, ctx: BotContext, msg: Message) -> ResponseResult<()> {
    if !ctx.config.is_authorized(msg.chat.id) {
        debug!("Ignoring message from unauthorized chat {}", msg.chat.id);
        return Ok(());
    }

    let text = if let Some(photos) = msg.photo() {
        // Telegram sends several sizes; the last one is the largest.
        let Some(photo) = photos.last() else {
            return Ok(());
        };
        let image = match download_photo(&bot, photo.file.id.clone()).await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Failed to download photo from chat {}: {e:?}", msg.chat.id);
                bot.send_message(msg.chat.id, IMAGE_ERROR_REPLY).await?;
                return Ok(());
            }
        };
        match ctx.ocr.extract_text(&image).await {
            Ok(text) => text,
            Err(e) => {
                error!("OCR failed for chat {}: {e:?}", msg.chat.id);
                bot.send_message(msg.chat.id, IMAGE_ERROR_REPLY).await?;
                return Ok(());
            }
        }
    } else if let Some(text) = msg.text() {
        text.to_string()
    } else {
        return Ok(());
    };

    if text.is_empty() {
        return Ok(());
    }

    let record = extractor::extract(&text);
    match ctx.store.append(&record).await {
        Ok(()) => {
            info!(
                "Appended expense from chat {}: {} / {}",
                msg.chat.id, record.amount, record.category
            );
            bot.send_message(msg.chat.id, format_confirmation(&record))
                .await?;
        }
        Err(e) => {
            error!("Failed to append expense from chat {}: {e}", msg.chat.id);
            bot.send_message(msg.chat.id, SAVE_ERROR_REPLY).await?;
        }
    }

    Ok(())
}

/// Fetch the raw bytes of a Telegram file.
async fn download_photo(bot: &Bot, file_id: FileId) -> Result<Vec<u8>> {
    let file = bot.get_file(file_id).await?;
    let url = format!(
        "https://api.telegram.org/file/bot{}/{}",
        bot.token(),
        file.path
    );
    let response = reqwest::get(&url).await?;
    let bytes = response.bytes().await?;
    Ok(bytes.to_vec())
}

pub fn format_confirmation(record: &ExpenseRecord) -> String {
    format!(
        "Guardado: ${} en {} el {}",
        record.amount, record.category, record.date
    )
}

pub fn format_day_report(fecha: &str, records: &[&ExpenseRecord]) -> String {
    let lines: Vec<String> = records
        .iter()
        .map(|r| format!("{} - {} - {}", r.amount, r.category, r.description))
        .collect();
    format!("Gastos el {fecha}:\n{}", lines.join("\n"))
}

pub fn format_category_total(category: &str, total: f64) -> String {
    format!("Total en {category}: ${total}")
}

pub fn format_range_total(desde: &str, hasta: &str, total: f64) -> String {
    format!("Total desde {desde} hasta {hasta}: ${total}")
}
