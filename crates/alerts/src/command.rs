//! Chat commands, menu buttons and the actions they map to.
//!
//! Text commands and inline button presses both resolve to an [`Action`],
//! which is executed by one processor.

use smartmoney_core::{TokenId, WalletAddress};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use teloxide::utils::command::BotCommands;

pub const CALLBACK_SCAN: &str = "scan";
pub const CALLBACK_OVERLAP: &str = "overlap";
pub const CALLBACK_MONITOR: &str = "monitor";
pub const CALLBACK_HELP: &str = "help";

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Show the main menu")]
    Start,
    #[command(description = "Show help")]
    Help,
    #[command(description = "Scan a token's first buyers. Usage: /scan <mint_address>")]
    Scan(String),
    #[command(description = "Find wallets common to every scanned token")]
    Overlap,
    #[command(description = "Monitor a wallet. Usage: /monitor <wallet> <callback_url>")]
    Monitor(String),
}

/// Wallet to watch and the public base URL Helius should call back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorRequest {
    pub wallet: WalletAddress,
    pub callback_base: String,
}

/// What the bot should do in response to a command or button.
///
/// `None` arguments mean the user did not supply them; the processor answers
/// with usage instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Menu,
    Help,
    Scan(Option<TokenId>),
    Overlap,
    Monitor(Option<MonitorRequest>),
}

impl Action {
    /// Map a parsed text command.
    pub fn from_command(cmd: Command) -> Self {
        match cmd {
            Command::Start => Action::Menu,
            Command::Help => Action::Help,
            Command::Scan(args) => Action::Scan(parse_scan_args(&args)),
            Command::Overlap => Action::Overlap,
            Command::Monitor(args) => Action::Monitor(parse_monitor_args(&args)),
        }
    }

    /// Map inline button data. Unknown data yields `None`.
    pub fn from_callback(data: &str) -> Option<Self> {
        match data {
            CALLBACK_SCAN => Some(Action::Scan(None)),
            CALLBACK_OVERLAP => Some(Action::Overlap),
            CALLBACK_MONITOR => Some(Action::Monitor(None)),
            CALLBACK_HELP => Some(Action::Help),
            _ => None,
        }
    }
}

fn parse_scan_args(args: &str) -> Option<TokenId> {
    args.split_whitespace()
        .next()
        .and_then(|mint| TokenId::new(mint).ok())
}

fn parse_monitor_args(args: &str) -> Option<MonitorRequest> {
    let mut parts = args.split_whitespace();
    let wallet = WalletAddress::new(parts.next()?).ok()?;
    let callback_base = parts.next()?.to_string();
    Some(MonitorRequest {
        wallet,
        callback_base,
    })
}

/// Inline keyboard shown with the welcome message.
pub fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback("1. Scan New Token", CALLBACK_SCAN)],
        vec![InlineKeyboardButton::callback("2. Find Overlap", CALLBACK_OVERLAP)],
        vec![InlineKeyboardButton::callback("3. Monitor Wallet", CALLBACK_MONITOR)],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BOT: &str = "smart_money_bot";

    #[test]
    fn test_parse_text_commands() {
        assert_eq!(Command::parse("/start", BOT).unwrap(), Command::Start);
        assert_eq!(Command::parse("/overlap", BOT).unwrap(), Command::Overlap);
        assert_eq!(
            Command::parse("/scan MintAddr111", BOT).unwrap(),
            Command::Scan("MintAddr111".to_string())
        );
    }

    #[test]
    fn test_scan_action() {
        assert_eq!(
            Action::from_command(Command::Scan("  Mint1 extra".to_string())),
            Action::Scan(Some(TokenId::new("Mint1").unwrap()))
        );
        assert_eq!(Action::from_command(Command::Scan(String::new())), Action::Scan(None));
    }

    #[test]
    fn test_monitor_action() {
        let action = Action::from_command(Command::Monitor(
            "Wallet1 https://abc.ngrok-free.app".to_string(),
        ));
        assert_eq!(
            action,
            Action::Monitor(Some(MonitorRequest {
                wallet: WalletAddress::new("Wallet1").unwrap(),
                callback_base: "https://abc.ngrok-free.app".to_string(),
            }))
        );
    }

    #[test]
    fn test_monitor_missing_url() {
        assert_eq!(
            Action::from_command(Command::Monitor("Wallet1".to_string())),
            Action::Monitor(None)
        );
    }

    #[test]
    fn test_callbacks_map_to_actions() {
        assert_eq!(Action::from_callback(CALLBACK_OVERLAP), Some(Action::Overlap));
        assert_eq!(Action::from_callback(CALLBACK_SCAN), Some(Action::Scan(None)));
        assert_eq!(Action::from_callback(CALLBACK_MONITOR), Some(Action::Monitor(None)));
        assert_eq!(Action::from_callback(CALLBACK_HELP), Some(Action::Help));
        assert_eq!(Action::from_callback("/findoverlap"), None);
    }

    #[test]
    fn test_menu_buttons_resolve() {
        let menu = main_menu();
        assert_eq!(menu.inline_keyboard.len(), 3);
        for row in &menu.inline_keyboard {
            for button in row {
                if let teloxide::types::InlineKeyboardButtonKind::CallbackData(data) = &button.kind {
                    assert!(Action::from_callback(data).is_some());
                } else {
                    panic!("menu button without callback data");
                }
            }
        }
    }
}
