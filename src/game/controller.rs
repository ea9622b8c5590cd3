//! The game controller: single owner of every piece of game state.
//!
//! ## Lifecycle of a round
//!
//! 1. Cancel every timer left over from the previous round.
//! 2. Deal a deck from the image pool, render it, start the preview.
//! 3. Preview expires: input unlocks.
//! 4. First accepted pick arms the countdown; every second pick arms the
//!    pair evaluation.
//! 5. Win or loss: timers are cancelled synchronously, progression is
//!    updated, and the round-end dialog is armed.
//!
//! Time only moves through [`GameController::advance_time`], which fires due
//! timers one at a time in a deterministic order.

use tracing::{debug, info, warn};

use super::adapter::{AudioCues, Presentation};
use crate::cards::{build_deck, AssetSource, FaceState, ImagePool};
use crate::core::{ChapterConfig, GameConfig, GameError, GameRng};
use crate::engine::{MatchEngine, RoundEvent, RoundPhase, RoundResult, RoundState, SelectOutcome};
use crate::progression::{ChapterProgression, ChapterStatus, SessionState};
use crate::timer::{RoundTimer, Scheduler, TimerHandle, TimerKind};

/// Drives rounds and chapters, and forwards state changes to the adapters.
///
/// ```
/// use chapter_match::cards::NumberedImageSource;
/// use chapter_match::core::GameConfig;
/// use chapter_match::game::{GameController, NullPresentation, SilentAudio};
///
/// let source = NumberedImageSource::all_portrait(40);
/// let mut game =
///     GameController::new(GameConfig::default(), &source, NullPresentation, SilentAudio).unwrap();
///
/// assert!(game.round().preview_active);
/// game.advance_time(5_000);
/// assert!(!game.round().input_locked);
/// ```
pub struct GameController<P, A> {
    config: GameConfig,
    pool: ImagePool,
    rng: GameRng,
    progression: ChapterProgression,
    engine: MatchEngine,
    scheduler: Scheduler<TimerKind>,
    timers: RoundTimer,
    /// Rounds dealt so far; feeds the per-round RNG stream.
    attempt: u64,
    presentation: P,
    audio: A,
}

impl<P: Presentation, A: AudioCues> GameController<P, A> {
    /// Probe the image source, deal chapter 1 and start its preview.
    ///
    /// Fails if the config is invalid or the source has no images, since an
    /// empty deck could never be won or lost.
    pub fn new<S: AssetSource + ?Sized>(
        config: GameConfig,
        source: &S,
        presentation: P,
        audio: A,
    ) -> Result<Self, GameError> {
        config.validate()?;

        let pool = ImagePool::probe(source);
        if pool.is_empty() {
            return Err(GameError::NoImages);
        }
        let rng = GameRng::new(config.seed);
        info!(seed = rng.seed(), "game created");
        let progression = ChapterProgression::new(config.chapters.clone());
        let chapter = *progression
            .current_chapter()
            .ok_or(GameError::UnknownChapter(progression.session().current_chapter_level))?;
        let engine = deal_round(&config, &pool, &rng, chapter, 1);

        let mut game = Self {
            config,
            pool,
            rng,
            progression,
            engine,
            scheduler: Scheduler::new(),
            timers: RoundTimer::new(),
            attempt: 1,
            presentation,
            audio,
        };
        game.present_round();
        Ok(game)
    }

    // === Player intents ===

    /// Turn over the card at `slot`.
    pub fn select_card(&mut self, slot: usize) -> SelectOutcome {
        let outcome = self.engine.select_card(slot);
        match outcome {
            SelectOutcome::Rejected(reason) => {
                debug!(slot, ?reason, "selection ignored");
            }
            SelectOutcome::Revealed { starts_countdown } => {
                if starts_countdown {
                    self.timers
                        .arm_countdown(&mut self.scheduler, self.config.tick_interval_ms);
                }
            }
            SelectOutcome::PairPending => {
                self.timers.arm_once(
                    &mut self.scheduler,
                    TimerKind::Evaluation,
                    self.config.evaluation_delay_ms,
                );
            }
        }
        self.flush_events();
        outcome
    }

    /// Let `ms` milliseconds pass, firing every timer that falls due.
    pub fn advance_time(&mut self, ms: u64) {
        let target = self.scheduler.now_ms().saturating_add(ms);
        while let Some((handle, kind)) = self.scheduler.pop_due(target) {
            if self.timers.claim(kind, handle) {
                self.dispatch(kind);
            }
        }
        self.scheduler.settle(target);
    }

    /// The round-end dialog button: next chapter, retry, or (after the last
    /// chapter) a fresh play-through. Does nothing while a round is active.
    pub fn continue_after_round(&mut self) -> ChapterStatus {
        let status = match self.progression.status() {
            active @ ChapterStatus::Active(_) => return active,
            ChapterStatus::Cleared(_) => self.progression.advance(),
            ChapterStatus::Failed(_) => self.progression.retry(),
            ChapterStatus::Completed => self.progression.restart(),
        };
        self.start_round();
        status
    }

    /// Discard all progress and start again from chapter 1.
    pub fn restart(&mut self) {
        info!("restart requested");
        self.progression.restart();
        self.start_round();
    }

    /// Debug shortcut: jump straight to the next chapter.
    ///
    /// Returns `false` (and changes nothing) on the last chapter.
    pub fn skip_chapter(&mut self) -> bool {
        if !self.progression.skip_chapter() {
            return false;
        }
        self.start_round();
        true
    }

    // === Read access ===

    #[must_use]
    pub fn round(&self) -> &RoundState {
        self.engine.state()
    }

    #[must_use]
    pub fn phase(&self) -> RoundPhase {
        self.engine.phase()
    }

    #[must_use]
    pub fn chapter(&self) -> &ChapterConfig {
        self.engine.chapter()
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        self.progression.session()
    }

    #[must_use]
    pub fn status(&self) -> ChapterStatus {
        self.progression.status()
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Timers still waiting to fire.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending_count()
    }

    /// The handle currently armed for `kind`.
    #[must_use]
    pub fn armed_timer(&self, kind: TimerKind) -> Option<TimerHandle> {
        self.timers.armed(kind)
    }

    /// Score the player sees: cleared chapters plus the live round.
    #[must_use]
    pub fn display_score(&self) -> u32 {
        match self.progression.status() {
            ChapterStatus::Active(_) | ChapterStatus::Failed(_) => self
                .progression
                .session()
                .cumulative_score
                .saturating_add(self.engine.state().score),
            ChapterStatus::Cleared(_) | ChapterStatus::Completed => {
                self.progression.session().cumulative_score
            }
        }
    }

    #[must_use]
    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    #[must_use]
    pub fn audio(&self) -> &A {
        &self.audio
    }

    // === Round lifecycle ===

    fn start_round(&mut self) {
        self.timers.cancel_all(&mut self.scheduler);

        let level = self.progression.session().current_chapter_level;
        let Some(chapter) = self.progression.current_chapter().copied() else {
            warn!(level, "no chapter configured, round not started");
            return;
        };

        self.attempt += 1;
        self.engine = deal_round(&self.config, &self.pool, &self.rng, chapter, self.attempt);
        self.present_round();
    }

    fn present_round(&mut self) {
        let chapter = *self.engine.chapter();
        let (deck_len, total_secs) = {
            let state = self.engine.state();
            (state.deck.len(), state.total_time_secs)
        };
        info!(
            level = chapter.level,
            attempt = self.attempt,
            cards = deck_len,
            "round dealt"
        );

        self.presentation.hide_round_end_dialog();
        self.presentation.clear_low_time_warning();
        self.presentation.update_chapter(chapter.level);
        self.presentation
            .render_deck(&self.engine.state().deck, chapter.grid_columns);
        let score = self.display_score();
        self.presentation.update_score(score);
        self.presentation.update_moves(0);
        self.presentation.update_time_remaining(total_secs, total_secs);
        if let Err(err) = self.audio.select_background_track_for_chapter(chapter.level) {
            debug!(error = %err, "background track unavailable");
        }

        self.engine.begin_preview();
        self.timers
            .arm_preview(&mut self.scheduler, chapter.preview_ms());
        self.flush_events();
    }

    fn dispatch(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::Preview => {
                self.engine.end_preview();
                self.flush_events();
            }
            TimerKind::Evaluation => self.resolve_pair(),
            TimerKind::Countdown => self.countdown_tick(),
            TimerKind::RoundEndDialog => self.show_round_end_dialog(),
        }
    }

    fn resolve_pair(&mut self) {
        if let Some(evaluation) = self.engine.evaluate_pair() {
            debug!(?evaluation, "pair resolved");
        }
        self.flush_events();
    }

    fn countdown_tick(&mut self) {
        // A pair resolving at the same instant as the final tick goes first,
        // so completing the last pair on the buzzer is a win.
        let state = self.engine.state();
        if state.countdown_live() && state.time_remaining_secs <= 1 {
            if let Some(handle) = self.timers.armed(TimerKind::Evaluation) {
                let due_now = self
                    .scheduler
                    .due_at(handle)
                    .is_some_and(|due| due <= self.scheduler.now_ms());
                if due_now {
                    self.timers.cancel(&mut self.scheduler, TimerKind::Evaluation);
                    self.resolve_pair();
                    if self.engine.phase().is_over() {
                        return;
                    }
                }
            }
        }

        self.engine.tick();
        self.flush_events();
    }

    fn on_round_end(&mut self, result: RoundResult) {
        self.timers.cancel_all(&mut self.scheduler);

        let status = match result {
            RoundResult::Won => {
                let state = self.engine.state();
                self.progression.record_win(state.score, state.moves)
            }
            RoundResult::Lost => self.progression.record_loss(),
        };
        debug!(?status, "progression updated");

        let score = self.display_score();
        self.presentation.update_score(score);
        self.timers.arm_once(
            &mut self.scheduler,
            TimerKind::RoundEndDialog,
            self.config.round_end_dialog_delay_ms,
        );
    }

    fn show_round_end_dialog(&mut self) {
        if let Some(summary) = self.progression.summary(self.engine.state()) {
            self.presentation
                .show_round_end_dialog(summary.outcome, &summary);
        }
    }

    /// Forward buffered engine events to the adapters.
    fn flush_events(&mut self) {
        for event in self.engine.drain_events() {
            match event {
                RoundEvent::PreviewShown => {
                    for slot in 0..self.engine.state().deck.len() {
                        self.presentation.set_face_state(slot, FaceState::Revealed);
                    }
                }
                RoundEvent::PreviewHidden => {
                    let deck = &self.engine.state().deck;
                    for entry in deck.iter().filter(|entry| entry.state != FaceState::Matched) {
                        self.presentation.set_face_state(entry.slot, entry.state);
                    }
                }
                RoundEvent::FaceChanged { slot, state } => {
                    self.presentation.set_face_state(slot, state);
                }
                RoundEvent::MovesChanged(moves) => self.presentation.update_moves(moves),
                RoundEvent::ScoreChanged(_) => {
                    let score = self.display_score();
                    self.presentation.update_score(score);
                }
                RoundEvent::TimeChanged {
                    remaining_secs,
                    total_secs,
                } => self
                    .presentation
                    .update_time_remaining(remaining_secs, total_secs),
                RoundEvent::LowTimeWarning => self.presentation.show_low_time_warning(),
                RoundEvent::PairMatched { .. } => {
                    if let Err(err) = self.audio.play_match_cue() {
                        debug!(error = %err, "match cue failed");
                    }
                }
                RoundEvent::RoundEnded(result) => self.on_round_end(result),
            }
        }
    }
}

/// Deal a fresh round for `chapter`.
///
/// Each attempt draws from its own RNG stream, so a retry gets a new deck.
fn deal_round(
    config: &GameConfig,
    pool: &ImagePool,
    rng: &GameRng,
    chapter: ChapterConfig,
    attempt: u64,
) -> MatchEngine {
    let mut deck_rng = rng.for_context(&format!("deck/{}/{}", chapter.level, attempt));
    let deck = build_deck(pool.for_pairs(chapter.pair_count), chapter.pair_count, &mut deck_rng);
    MatchEngine::new(
        chapter,
        deck.entries,
        config.scoring,
        config.low_time_threshold_secs,
    )
}
