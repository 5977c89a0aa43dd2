use tracing::{error, info, warn};

use super::{Command, Inbound};
use crate::error::Error;
use crate::gate::SubscriptionGate;
use crate::notify::Notifier;
use crate::roles::assigner::RoleAssigner;
use crate::roles::store::RoleStore;
use crate::roles::{Role, RoleAssignment, UNKNOWN_NAME};

const PERMISSION_DENIED: &str = "You do not have admin rights.";
const PERSISTENCE_FAILED: &str =
    "Something went wrong while saving your role. Please try again later.";
const GIVEROLE_USAGE: &str = "Usage: /giverole <user_id> <role>";
const SUBMISSION_ACK: &str = "Your post has been received, thank you!";

const CHALLENGE_INFO: &str = "\u{1F44B} Welcome!\n\n\
    You have joined the Content Creator Battle challenge.\n\
    Content creators get a topic and prepare a post for the channel.\n\
    Spectators follow the challenge and share their thoughts; active \
    spectators are also entered into random giveaways.\n\
    Let's go! \u{1F525}";

const CREATOR_NEXT_STEPS: &str =
    "As a content creator, please reach out to the admin for your topic.";

/// Dispatches inbound commands against the store, the assigner, and the two
/// platform capabilities. All recoverable errors stop here as reply text;
/// nothing escapes to crash the process.
pub struct CommandRouter {
    store: RoleStore,
    assigner: RoleAssigner,
    gate: Box<dyn SubscriptionGate>,
    notifier: Box<dyn Notifier>,
    admin_id: u64,
    max_content_creators: usize,
}

impl CommandRouter {
    pub fn new(
        store: RoleStore,
        assigner: RoleAssigner,
        gate: Box<dyn SubscriptionGate>,
        notifier: Box<dyn Notifier>,
        admin_id: u64,
        max_content_creators: usize,
    ) -> Self {
        Self {
            store,
            assigner,
            gate,
            notifier,
            admin_id,
            max_content_creators,
        }
    }

    pub fn store(&self) -> &RoleStore {
        &self.store
    }

    /// Handles one inbound message; returns the reply for the sender, or
    /// `None` when the message is not addressed to the bot.
    pub async fn dispatch(&mut self, msg: &Inbound) -> Option<String> {
        match Command::parse(&msg.text) {
            Command::Start => Some(self.handle_start(msg).await),
            Command::Roles => Some(self.handle_roles(msg.user_id)),
            Command::ResetRoles => Some(self.handle_reset(msg.user_id)),
            Command::GiveRole { args } => Some(self.handle_giverole(msg.user_id, args).await),
            Command::Other => self.handle_other(msg.user_id),
        }
    }

    async fn handle_start(&mut self, msg: &Inbound) -> String {
        if !self.gate.is_member(msg.user_id).await {
            return "Please join the challenge channel first, then send /start again.".to_string();
        }

        if let Some(existing) = self.store.get(msg.user_id) {
            return report_existing(existing);
        }

        let role = self.assigner.assign(
            self.store.count_by_role(Role::ContentCreator),
            self.max_content_creators,
        );
        let display_name = msg
            .username
            .clone()
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());

        if let Err(e) = self.store.upsert(msg.user_id, display_name.clone(), role) {
            error!("failed to persist assignment for {}: {e}", msg.user_id);
            return PERSISTENCE_FAILED.to_string();
        }
        info!(user_id = msg.user_id, role = %role, "assigned role");

        let mut reply = format!("{CHALLENGE_INFO}\n\nYour role: {role}");
        if role == Role::ContentCreator {
            reply.push('\n');
            reply.push_str(CREATOR_NEXT_STEPS);
            self.congratulate_admin(&format!(
                "\u{1F389} @{display_name} was assigned the content_creator role!"
            ))
            .await;
        }
        reply
    }

    fn handle_roles(&self, caller_id: u64) -> String {
        if caller_id != self.admin_id {
            return PERMISSION_DENIED.to_string();
        }
        if self.store.is_empty() {
            return "No roles have been assigned yet.".to_string();
        }

        let mut assignments: Vec<&RoleAssignment> = self.store.iter().collect();
        assignments.sort_by_key(|a| a.user_id);

        let mut text = String::from("Assigned roles:\n");
        for a in assignments {
            text.push_str(&format!(
                "ID: {}, Username: @{}, Role: {}\n",
                a.user_id, a.display_name, a.role
            ));
        }
        text
    }

    fn handle_reset(&mut self, caller_id: u64) -> String {
        if caller_id != self.admin_id {
            return PERMISSION_DENIED.to_string();
        }
        if let Err(e) = self.store.clear_all() {
            error!("failed to persist cleared state: {e}");
            return PERSISTENCE_FAILED.to_string();
        }
        "All roles have been cleared. Send /start to join the new round.".to_string()
    }

    async fn handle_giverole(&mut self, caller_id: u64, args: &str) -> String {
        if caller_id != self.admin_id {
            return PERMISSION_DENIED.to_string();
        }

        let (user_id, role) = match parse_giverole(args) {
            Ok(parsed) => parsed,
            Err(Error::Validation(detail)) => return detail,
            Err(_) => return GIVEROLE_USAGE.to_string(),
        };

        let display_name = self
            .gate
            .display_name(user_id)
            .await
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());

        // Manual grant: bypasses both the cap and the already-assigned
        // short-circuit.
        if let Err(e) = self.store.upsert(user_id, display_name.clone(), role) {
            error!("failed to persist manual grant for {user_id}: {e}");
            return PERSISTENCE_FAILED.to_string();
        }
        info!(user_id, role = %role, "manual role grant");

        if role == Role::ContentCreator {
            self.congratulate_admin(&format!(
                "\u{1F389} @{display_name} was manually granted the content_creator role!"
            ))
            .await;
            if let Err(e) = self
                .notifier
                .notify(
                    user_id,
                    &format!(
                        "\u{1F389} A re-draw took place and you are now a content creator!\n{CREATOR_NEXT_STEPS}"
                    ),
                )
                .await
            {
                warn!("could not notify user {user_id} of manual grant: {e}");
            }
        }

        format!("Gave the '{role}' role to user ID {user_id}.")
    }

    fn handle_other(&self, user_id: u64) -> Option<String> {
        match self.store.get(user_id) {
            Some(a) if a.role == Role::ContentCreator => Some(SUBMISSION_ACK.to_string()),
            _ => None,
        }
    }

    async fn congratulate_admin(&self, text: &str) {
        if let Err(e) = self.notifier.notify(self.admin_id, text).await {
            warn!("could not notify admin: {e}");
        }
    }
}

fn report_existing(assignment: &RoleAssignment) -> String {
    let mut reply = format!("Your assigned role: {}", assignment.role);
    if assignment.role == Role::ContentCreator {
        reply.push('\n');
        reply.push_str(CREATOR_NEXT_STEPS);
    }
    reply
}

fn parse_giverole(args: &str) -> Result<(u64, Role), Error> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(Error::Validation(GIVEROLE_USAGE.to_string()));
    }
    let role: Role = parts[1].parse().map_err(|_| {
        Error::Validation("The role can only be 'content_creator' or 'spectator'.".to_string())
    })?;
    let user_id: u64 = parts[0]
        .parse()
        .map_err(|_| Error::Validation("Please provide a valid numeric user id.".to_string()))?;
    Ok((user_id, role))
}
