//! The character status screen: one allocation session bound to the API.
//!
//! Committing is split into three steps so a caller can keep editing
//! while the request is in flight:
//!
//! 1. [`StatusScreen::prepare_commit`] snapshots the payload into a
//!    [`CommitTicket`]. Later edits or resets cannot change it.
//! 2. [`CommitTicket::send`] performs the update and re-fetches the
//!    character. It borrows nothing from the screen.
//! 3. [`StatusScreen::apply_commit`] installs the result, unless the
//!    screen has reloaded since the ticket was taken.
//!
//! Dropping the screen while a ticket is outstanding simply leaves the
//! result with nowhere to go.

use tracing::{info, warn};

use qb_core::{AllocationSession, Attribute, Character, CharacterId, StatusUpdate};

use crate::api::CharacterApi;
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone)]
struct Loaded {
    character: Character,
    session: AllocationSession,
}

/// Host for the allocation session of one character.
#[derive(Debug)]
pub struct StatusScreen<A> {
    api: A,
    character_id: CharacterId,
    loaded: Option<Loaded>,
    epoch: u64,
}

/// A status commit captured at the moment it was requested.
#[derive(Debug, Clone)]
pub struct CommitTicket {
    character: Character,
    update: StatusUpdate,
    spent: u32,
    epoch: u64,
}

impl CommitTicket {
    /// The character being updated.
    pub fn character_id(&self) -> CharacterId {
        self.character.id
    }

    /// The payload that will be sent.
    pub fn update(&self) -> StatusUpdate {
        self.update
    }

    /// Screen epoch at the time the ticket was taken.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Send the update, then re-read the character so derived fields come
    /// from the server. If the update succeeds but the re-read fails, the
    /// status returned by the update is used instead.
    pub async fn send<A: CharacterApi>(&self, api: &A) -> ClientResult<Character> {
        let id = self.character.id;
        let status = api.update_status(id, self.update).await?;

        match api.fetch_character(id).await {
            Ok(character) => Ok(character),
            Err(e) => {
                warn!(%id, error = %e, "reload after commit failed, using returned status");
                let mut character = self.character.clone();
                character.status = status;
                character.available_attribute_points =
                    character.available_attribute_points.saturating_sub(self.spent);
                Ok(character)
            }
        }
    }
}

impl<A: CharacterApi> StatusScreen<A> {
    /// A screen for `character_id`. Nothing is loaded until [`Self::load`].
    pub fn new(api: A, character_id: CharacterId) -> Self {
        Self {
            api,
            character_id,
            loaded: None,
            epoch: 0,
        }
    }

    /// The API this screen talks to.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// The character this screen shows.
    pub fn character_id(&self) -> CharacterId {
        self.character_id
    }

    /// The loaded character, as last confirmed by the server.
    pub fn character(&self) -> Option<&Character> {
        self.loaded.as_ref().map(|l| &l.character)
    }

    /// The current allocation session.
    pub fn session(&self) -> Option<&AllocationSession> {
        self.loaded.as_ref().map(|l| &l.session)
    }

    /// Incremented on every (re)load.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Fetch the character and start a fresh session, discarding any
    /// pending allocation. On failure the previous state is kept.
    pub async fn load(&mut self) -> ClientResult<&Character> {
        let character = self.api.fetch_character(self.character_id).await?;
        Ok(&self.install(character).character)
    }

    /// Spend a point on `attr`. False if nothing is loaded or no points remain.
    pub fn increase(&mut self, attr: Attribute) -> bool {
        self.loaded
            .as_mut()
            .is_some_and(|l| l.session.increase(attr))
    }

    /// Take a point back from `attr`. False if nothing is loaded or `attr`
    /// is at its baseline.
    pub fn decrease(&mut self, attr: Attribute) -> bool {
        self.loaded
            .as_mut()
            .is_some_and(|l| l.session.decrease(attr))
    }

    /// Spend up to `count` points on `attr`. Returns how many were spent.
    pub fn increase_by(&mut self, attr: Attribute, count: u32) -> u32 {
        self.loaded
            .as_mut()
            .map_or(0, |l| l.session.increase_by(attr, count))
    }

    /// Take back up to `count` points from `attr`. Returns how many were
    /// taken back.
    pub fn decrease_by(&mut self, attr: Attribute, count: u32) -> u32 {
        self.loaded
            .as_mut()
            .map_or(0, |l| l.session.decrease_by(attr, count))
    }

    /// Discard pending changes. False if nothing is loaded.
    pub fn reset(&mut self) -> bool {
        match self.loaded.as_mut() {
            Some(l) => {
                l.session.reset();
                true
            }
            None => false,
        }
    }

    /// Snapshot the current allocation for sending.
    pub fn prepare_commit(&self) -> Option<CommitTicket> {
        self.loaded.as_ref().map(|l| CommitTicket {
            character: l.character.clone(),
            update: l.session.update(),
            spent: l.session.spent(),
            epoch: self.epoch,
        })
    }

    /// Install the outcome of a sent ticket.
    ///
    /// Returns `Ok(true)` when the refreshed character became the new
    /// baseline and `Ok(false)` when the ticket was stale and its result
    /// was dropped. A failed commit leaves the session untouched and is
    /// returned as [`ClientError::NotApplied`].
    pub fn apply_commit(
        &mut self,
        ticket: &CommitTicket,
        result: ClientResult<Character>,
    ) -> ClientResult<bool> {
        if ticket.epoch != self.epoch || ticket.character.id != self.character_id {
            warn!(
                id = %ticket.character.id,
                ticket_epoch = ticket.epoch,
                epoch = self.epoch,
                "discarding result of stale commit"
            );
            return Ok(false);
        }

        match result {
            Ok(character) => {
                info!(id = %character.id, "attributes committed");
                self.install(character);
                Ok(true)
            }
            Err(e) => {
                warn!(id = %ticket.character.id, error = %e, "commit failed");
                Err(ClientError::NotApplied(Box::new(e)))
            }
        }
    }

    /// Prepare, send, and apply in one go.
    pub async fn commit(&mut self) -> ClientResult<()> {
        let ticket = self.prepare_commit().ok_or(ClientError::NotLoaded)?;
        let result = ticket.send(&self.api).await;
        self.apply_commit(&ticket, result).map(|_| ())
    }

    fn install(&mut self, character: Character) -> &Loaded {
        self.epoch += 1;
        let session = AllocationSession::from_character(&character);
        self.loaded.insert(Loaded { character, session })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use qb_core::{NewCharacter, Status, UserId};

    use super::*;

    #[derive(Debug, Default)]
    struct FakeState {
        characters: HashMap<CharacterId, Character>,
        sent: Vec<StatusUpdate>,
        fail_updates: bool,
        fail_fetches: bool,
    }

    /// In-memory server that applies updates the way the real one does:
    /// points are deducted and max health follows strength.
    #[derive(Debug, Clone, Default)]
    struct FakeApi {
        state: Arc<Mutex<FakeState>>,
    }

    impl FakeApi {
        fn with_character(character: Character) -> Self {
            let api = Self::default();
            api.state
                .lock()
                .unwrap()
                .characters
                .insert(character.id, character);
            api
        }

        fn fail_updates(&self, fail: bool) {
            self.state.lock().unwrap().fail_updates = fail;
        }

        fn fail_fetches(&self, fail: bool) {
            self.state.lock().unwrap().fail_fetches = fail;
        }

        fn sent(&self) -> Vec<StatusUpdate> {
            self.state.lock().unwrap().sent.clone()
        }
    }

    impl CharacterApi for FakeApi {
        async fn list_characters(&self, _user: UserId) -> ClientResult<Vec<Character>> {
            Ok(self.state.lock().unwrap().characters.values().cloned().collect())
        }

        async fn create_character(&self, _new: &NewCharacter) -> ClientResult<Character> {
            Err(ClientError::Server {
                status: 501,
                message: "not supported".to_string(),
            })
        }

        async fn fetch_character(&self, id: CharacterId) -> ClientResult<Character> {
            let state = self.state.lock().unwrap();
            if state.fail_fetches {
                return Err(ClientError::Network("connection reset".to_string()));
            }
            state
                .characters
                .get(&id)
                .cloned()
                .ok_or_else(|| ClientError::NotFound(format!("character {id}")))
        }

        async fn update_status(&self, id: CharacterId, update: StatusUpdate) -> ClientResult<Status> {
            let mut state = self.state.lock().unwrap();
            if state.fail_updates {
                return Err(ClientError::Network("connection refused".to_string()));
            }
            state.sent.push(update);
            let character = state
                .characters
                .get_mut(&id)
                .ok_or_else(|| ClientError::NotFound(format!("character {id}")))?;

            let before = character.status.allocatable();
            let spent = (update.strength - before.strength)
                + (update.dexterity - before.dexterity)
                + (update.wisdom - before.wisdom)
                + (update.perception - before.perception);
            if spent < 0 || spent as u32 > character.available_attribute_points {
                return Err(ClientError::Rejected {
                    status: 400,
                    message: "inconsistent with ledger".to_string(),
                });
            }

            character.available_attribute_points -= spent as u32;
            character.status.strength = update.strength;
            character.status.dexterity = update.dexterity;
            character.status.wisdom = update.wisdom;
            character.status.perception = update.perception;
            character.status.max_health = 50 + 10 * update.strength;
            Ok(character.status.clone())
        }
    }

    fn character(points: u32) -> Character {
        Character {
            id: CharacterId(7),
            name: "Aria".to_string(),
            image: String::new(),
            level: 2,
            experience: 10,
            experience_next_level: 200,
            available_attribute_points: points,
            total_attribute_points: 0,
            coins: 100,
            create_at: None,
            update_at: None,
            status: Status {
                health: 100,
                max_health: 100,
                mana: 40,
                max_mana: 40,
                strength: 5,
                dexterity: 5,
                wisdom: 5,
                perception: 5,
                ..Status::default()
            },
        }
    }

    async fn loaded_screen(points: u32) -> (StatusScreen<FakeApi>, FakeApi) {
        let api = FakeApi::with_character(character(points));
        let mut screen = StatusScreen::new(api.clone(), CharacterId(7));
        screen.load().await.unwrap();
        (screen, api)
    }

    #[tokio::test]
    async fn load_starts_session_from_server() {
        let (screen, _api) = loaded_screen(3).await;
        let session = screen.session().unwrap();
        assert_eq!(session.budget(), 3);
        assert_eq!(session.baseline().strength, 5);
        assert_eq!(screen.epoch(), 1);
    }

    #[tokio::test]
    async fn load_missing_character() {
        let api = FakeApi::default();
        let mut screen = StatusScreen::new(api, CharacterId(99));
        assert!(matches!(
            screen.load().await,
            Err(ClientError::NotFound(_))
        ));
        assert!(screen.session().is_none());
    }

    #[tokio::test]
    async fn edits_without_load_are_noops() {
        let api = FakeApi::with_character(character(3));
        let mut screen = StatusScreen::new(api, CharacterId(7));
        assert!(!screen.increase(Attribute::Strength));
        assert!(!screen.decrease(Attribute::Strength));
        assert!(!screen.reset());
        assert!(screen.prepare_commit().is_none());
        assert!(matches!(screen.commit().await, Err(ClientError::NotLoaded)));
    }

    #[tokio::test]
    async fn bulk_edits_are_capped() {
        let (mut screen, _api) = loaded_screen(3).await;
        assert_eq!(screen.increase_by(Attribute::Strength, 4_000_000_000), 3);
        assert_eq!(screen.decrease_by(Attribute::Strength, 4_000_000_000), 3);
        assert_eq!(screen.session().unwrap().budget(), 3);

        let mut empty = StatusScreen::new(FakeApi::default(), CharacterId(1));
        assert_eq!(empty.increase_by(Attribute::Wisdom, 5), 0);
        assert_eq!(empty.decrease_by(Attribute::Wisdom, 5), 0);
    }

    #[tokio::test]
    async fn ticket_carries_target_and_payload() {
        let (mut screen, api) = loaded_screen(2).await;
        assert_eq!(screen.character_id(), CharacterId(7));
        screen.increase(Attribute::Perception);

        let ticket = screen.prepare_commit().unwrap();
        assert_eq!(ticket.character_id(), screen.character_id());
        assert_eq!(ticket.epoch(), screen.epoch());
        assert_eq!(ticket.update().perception, 6);
        assert_eq!(ticket.update(), screen.session().unwrap().update());

        let result = ticket.send(screen.api()).await;
        assert!(screen.apply_commit(&ticket, result).unwrap());
        assert_eq!(api.sent(), vec![ticket.update()]);
    }

    #[tokio::test]
    async fn commit_reloads_canonical_status() {
        let (mut screen, api) = loaded_screen(3).await;
        screen.increase(Attribute::Strength);
        screen.increase(Attribute::Strength);
        screen.increase(Attribute::Wisdom);

        screen.commit().await.unwrap();

        let session = screen.session().unwrap();
        assert_eq!(session.baseline().strength, 7);
        assert_eq!(session.baseline().wisdom, 6);
        assert_eq!(session.baseline().max_health, 120);
        assert_eq!(session.budget(), 0);
        assert!(!session.is_dirty());
        assert_eq!(api.sent().len(), 1);
    }

    #[tokio::test]
    async fn failed_commit_keeps_pending_allocation() {
        let (mut screen, api) = loaded_screen(3).await;
        screen.increase(Attribute::Dexterity);
        screen.increase(Attribute::Perception);
        let before = screen.session().unwrap().clone();

        api.fail_updates(true);
        let err = screen.commit().await.unwrap_err();
        assert!(matches!(err, ClientError::NotApplied(_)));
        assert_eq!(screen.session().unwrap(), &before);

        api.fail_updates(false);
        screen.commit().await.unwrap();
        assert_eq!(screen.session().unwrap().baseline().dexterity, 6);
    }

    #[tokio::test]
    async fn rejected_commit_keeps_pending_allocation() {
        let (mut screen, api) = loaded_screen(1).await;
        screen.increase(Attribute::Strength);
        api.state
            .lock()
            .unwrap()
            .characters
            .get_mut(&CharacterId(7))
            .unwrap()
            .available_attribute_points = 0;

        let before = screen.session().unwrap().clone();
        let err = screen.commit().await.unwrap_err();
        match err {
            ClientError::NotApplied(inner) => {
                assert!(matches!(*inner, ClientError::Rejected { status: 400, .. }))
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(screen.session().unwrap(), &before);
    }

    #[tokio::test]
    async fn reset_during_flight_does_not_change_payload() {
        let (mut screen, api) = loaded_screen(3).await;
        screen.increase(Attribute::Strength);
        screen.increase(Attribute::Strength);

        let ticket = screen.prepare_commit().unwrap();
        screen.reset();
        let result = ticket.send(&api).await;

        assert_eq!(api.sent()[0].strength, 7);
        assert!(screen.apply_commit(&ticket, result).unwrap());
        assert_eq!(screen.session().unwrap().baseline().strength, 7);
        assert_eq!(screen.session().unwrap().budget(), 1);
    }

    #[tokio::test]
    async fn stale_result_is_discarded_after_reload() {
        let (mut screen, api) = loaded_screen(3).await;
        screen.increase(Attribute::Wisdom);
        let ticket = screen.prepare_commit().unwrap();

        screen.load().await.unwrap();
        screen.increase(Attribute::Perception);
        let pending = screen.session().unwrap().clone();

        let result = ticket.send(&api).await;
        assert!(!screen.apply_commit(&ticket, result).unwrap());
        assert_eq!(screen.session().unwrap(), &pending);
    }

    #[tokio::test]
    async fn stale_failure_is_discarded_too() {
        let (mut screen, api) = loaded_screen(3).await;
        let ticket = screen.prepare_commit().unwrap();
        screen.load().await.unwrap();

        api.fail_updates(true);
        let result = ticket.send(&api).await;
        assert!(result.is_err());
        assert!(!screen.apply_commit(&ticket, result).unwrap());
    }

    #[tokio::test]
    async fn dropped_screen_leaves_ticket_usable() {
        let (mut screen, api) = loaded_screen(2).await;
        screen.increase(Attribute::Dexterity);
        let ticket = screen.prepare_commit().unwrap();
        drop(screen);

        let character = ticket.send(&api).await.unwrap();
        assert_eq!(character.status.dexterity, 6);
    }

    #[tokio::test]
    async fn reload_failure_falls_back_to_returned_status() {
        let (mut screen, api) = loaded_screen(3).await;
        screen.increase(Attribute::Strength);
        screen.increase(Attribute::Perception);
        let ticket = screen.prepare_commit().unwrap();

        api.fail_fetches(true);
        let character = ticket.send(&api).await.unwrap();
        assert_eq!(character.status.strength, 6);
        assert_eq!(character.status.max_health, 110);
        assert_eq!(character.available_attribute_points, 1);

        assert!(screen.apply_commit(&ticket, Ok(character)).unwrap());
        assert_eq!(screen.session().unwrap().budget(), 1);
    }

    #[tokio::test]
    async fn reset_then_commit_sends_baseline() {
        let (mut screen, api) = loaded_screen(3).await;
        screen.increase(Attribute::Strength);
        screen.reset();
        screen.commit().await.unwrap();

        let sent = api.sent();
        assert_eq!(sent[0], character(3).status.allocatable());
        assert_eq!(screen.session().unwrap().budget(), 3);
    }
}
