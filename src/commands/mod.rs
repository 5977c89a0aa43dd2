pub mod router;

/// One inbound message, reduced to what dispatch needs. The platform layer
/// builds this; the router never sees transport types.
pub struct Inbound {
    pub user_id: u64,
    pub username: Option<String>,
    pub text: String,
}

/// The command surface. Anything that is not a known command falls through to
/// `Other`, which only matters for current content creators.
pub enum Command<'a> {
    Start,
    Roles,
    ResetRoles,
    GiveRole { args: &'a str },
    Other,
}

impl<'a> Command<'a> {
    pub fn parse(text: &'a str) -> Self {
        let trimmed = text.trim();
        let (head, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest),
            None => (trimmed, ""),
        };
        match head {
            "/start" => Command::Start,
            "/roles" => Command::Roles,
            "/resetroles" => Command::ResetRoles,
            "/giverole" => Command::GiveRole { args: rest },
            _ => Command::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_arguments() {
        assert!(matches!(Command::parse("/start"), Command::Start));
        assert!(matches!(Command::parse("  /roles  "), Command::Roles));
        assert!(matches!(Command::parse("/resetroles"), Command::ResetRoles));
        match Command::parse("/giverole 42 spectator") {
            Command::GiveRole { args } => assert_eq!(args, "42 spectator"),
            _ => panic!("expected giverole"),
        }
    }

    #[test]
    fn plain_text_is_other() {
        assert!(matches!(Command::parse("hello there"), Command::Other));
        assert!(matches!(Command::parse("/startling"), Command::Other));
    }
}
