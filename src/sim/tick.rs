//! Fixed timestep simulation tick
//!
//! The stage controller: applies input, advances the paddle and ball, runs
//! the collision resolver and turns its findings into score, word-learning
//! and phase changes.

use rand::seq::{IndexedRandom, SliceRandom};

use super::collision::{self, BlockHit, HitOutcome};
use super::rect::Rect;
use super::state::{Block, BlockKind, GamePhase, GameState, LaunchHint};
use super::words::StagePolicy;
use crate::audio::Cue;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Where the paddle centre should go (pointer or virtual stick position)
    pub target_x: Option<f32>,
    /// Primary action (click / confirm button)
    pub action: bool,
    /// Hard mode toggle
    pub toggle_hard_mode: bool,
}

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Cue(Cue),
    PhaseChanged { from: GamePhase, to: GamePhase },
    Launched,
    BlockHit {
        block_id: u32,
        word_id: Option<u32>,
        outcome: HitOutcome,
    },
    DoorUnlocked,
    LifeLost { lives_left: u32 },
    GameOver,
    StageCleared { stage: u32 },
}

/// Advance the game by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    state.time_ticks += 1;

    if input.toggle_hard_mode {
        toggle_hard_mode(state, &mut events);
    }
    if input.action {
        handle_action(state, &mut events);
    }

    // A freshly set up stage keeps its home positions for this tick
    let stage_started = events.iter().any(|e| {
        matches!(
            e,
            GameEvent::PhaseChanged {
                to: GamePhase::StageStart,
                ..
            }
        )
    });

    match state.phase {
        GamePhase::StageStart => {
            if !stage_started {
                move_paddle(state, input);
            }
            state.attach_ball_to_paddle();
        }
        GamePhase::Playing => update_playing(state, input, dt, &mut events),
        GamePhase::StageClear => update_stage_clear(state, &mut events),
        GamePhase::Title | GamePhase::GameOver | GamePhase::Result => {}
    }

    events
}

/// Set up `stage`: draw its words, lay out the answer blocks, re-home entities
pub fn start_stage(state: &mut GameState, stage: u32, events: &mut Vec<GameEvent>) {
    state.stage = stage;
    state.stage_words = state
        .words
        .stage_words(stage, StagePolicy::from(&state.config), &mut state.rng);
    state.current_question = state.stage_words.first().cloned();
    state.clear_ticks = 0;

    state.reset_entities();
    arrange_blocks(state);

    match &state.current_question {
        Some(q) => log::info!(
            "Stage {stage}: \"{}\" ({} blocks, {} words drawn)",
            q.word,
            state.blocks.len(),
            state.stage_words.len()
        ),
        None => log::warn!("Stage {stage}: no question available"),
    }

    set_phase(state, GamePhase::StageStart, events);
}

/// Lay out the current question's answers in one centred row
///
/// One correct block plus up to `block_columns - 1` wrong answers taken from
/// other words, in random column order.
pub fn arrange_blocks(state: &mut GameState) {
    let Some(question) = state.current_question.clone() else {
        return;
    };

    let distractor_count = state.config.block_columns.saturating_sub(1);
    let others: Vec<&str> = state
        .words
        .all_words()
        .iter()
        .filter(|w| w.id != question.id && w.ja != question.ja)
        .map(|w| w.ja.as_str())
        .collect();
    let mut choices: Vec<(String, bool)> = others
        .choose_multiple(&mut state.rng, distractor_count)
        .map(|ja| (ja.to_string(), false))
        .collect();
    if choices.len() < distractor_count {
        log::warn!(
            "Only {} wrong answers available for \"{}\"",
            choices.len(),
            question.word
        );
    }
    choices.push((question.ja.clone(), true));
    choices.shuffle(&mut state.rng);

    let config = &state.config;
    let n = choices.len() as f32;
    let total_width = n * config.block_width + (n - 1.0) * config.block_spacing_x;
    let start_x = (config.screen_width - total_width) / 2.0;
    let (block_width, block_height, spacing, row_y, hp) = (
        config.block_width,
        config.block_height,
        config.block_spacing_x,
        config.block_row_y,
        config.block_correct_hp,
    );

    for (col, (text, correct)) in choices.into_iter().enumerate() {
        let x = start_x + col as f32 * (block_width + spacing);
        let kind = if correct {
            state.remaining_correct_blocks += 1;
            BlockKind::Correct { hp }
        } else {
            BlockKind::Incorrect
        };
        let id = state.next_entity_id();
        state.blocks.push(Block::new(
            id,
            Rect::new(x, row_y, block_width, block_height),
            kind,
            Some(question.id),
            text,
        ));
    }
}

fn set_phase(state: &mut GameState, phase: GamePhase, events: &mut Vec<GameEvent>) {
    let from = state.phase;
    state.phase = phase;
    log::info!("Phase {from:?} -> {phase:?} (stage {})", state.stage);
    events.push(GameEvent::PhaseChanged { from, to: phase });
}

fn handle_action(state: &mut GameState, events: &mut Vec<GameEvent>) {
    match state.phase {
        GamePhase::Title => {
            state.score.reset();
            state.words.reset();
            start_stage(state, 1, events);
        }
        GamePhase::StageStart => {
            launch_ball(state, events);
            set_phase(state, GamePhase::Playing, events);
        }
        GamePhase::Playing => {
            // Relaunch after a respawn
            if !state.ball.launched {
                launch_ball(state, events);
            }
        }
        GamePhase::GameOver => {
            state.score.continue_game();
            let stage = state.stage;
            start_stage(state, stage, events);
        }
        GamePhase::Result => restart(state, false, events),
        GamePhase::StageClear => {}
    }
}

fn toggle_hard_mode(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.phase == GamePhase::Result {
        restart(state, true, events);
    } else {
        state.hard_mode = !state.hard_mode;
        log::info!("Hard mode {}", if state.hard_mode { "on" } else { "off" });
    }
}

/// New run from stage 1
fn restart(state: &mut GameState, hard_mode: bool, events: &mut Vec<GameEvent>) {
    state.hard_mode = hard_mode;
    state.score.reset();
    state.words.reset();
    start_stage(state, 1, events);
}

fn launch_ball(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.ball.launched {
        return;
    }
    let hint = LaunchHint::from(state.paddle.direction);
    state.ball.launch(hint, &state.config, &mut state.rng);
    events.push(GameEvent::Launched);
}

fn move_paddle(state: &mut GameState, input: &TickInput) {
    let target = input.target_x.unwrap_or_else(|| state.paddle.center_x());
    state
        .paddle
        .update(target, state.config.screen_width, state.config.paddle_dead_band);
}

fn update_playing(state: &mut GameState, input: &TickInput, dt: f32, events: &mut Vec<GameEvent>) {
    move_paddle(state, input);

    if !state.ball.launched {
        state.attach_ball_to_paddle();
    } else {
        state.ball.update(dt);

        let report = collision::resolve(
            &mut state.ball,
            &state.paddle,
            &mut state.blocks,
            &state.door,
            &state.config,
            dt,
        );

        if report.wall.bounced() {
            events.push(GameEvent::Cue(Cue::Bounce));
        }

        if report.wall.fell_out {
            ball_lost(state, events);
        } else {
            if report.paddle {
                events.push(GameEvent::Cue(Cue::Bounce));
            }
            if let Some(hit) = report.block {
                apply_block_hit(state, hit, events);
            }
            if report.door {
                events.push(GameEvent::Cue(Cue::Clear));
                events.push(GameEvent::StageCleared { stage: state.stage });
                state.clear_ticks = state.config.stage_clear_ticks();
                set_phase(state, GamePhase::StageClear, events);
            }
        }
    }

    if state.phase == GamePhase::Playing
        && state.remaining_correct_blocks == 0
        && state.door.is_locked()
    {
        state.door.unlock();
        events.push(GameEvent::DoorUnlocked);
    }
}

fn apply_block_hit(state: &mut GameState, hit: BlockHit, events: &mut Vec<GameEvent>) {
    match hit.outcome {
        HitOutcome::Destroyed => {
            events.push(GameEvent::Cue(Cue::Correct));
            let added = state.score.add_block_score();
            if let Some(id) = hit.word_id {
                state.words.mark_correct(id);
            }
            state.remaining_correct_blocks = state.remaining_correct_blocks.saturating_sub(1);
            log::debug!(
                "Correct block {} destroyed (+{added}, combo {})",
                hit.block_id,
                state.score.combo_count()
            );
        }
        HitOutcome::Incorrect => {
            events.push(GameEvent::Cue(Cue::Bounce));
            state.score.reset_combo();
            if let Some(id) = hit.word_id {
                state.words.mark_miss(id);
                if let Some(word) = state.words.word(id) {
                    log::debug!("Wrong answer for \"{}\" (block {})", word.word, hit.block_id);
                }
            }
        }
        HitOutcome::Damaged => events.push(GameEvent::Cue(Cue::Bounce)),
    }

    events.push(GameEvent::BlockHit {
        block_id: hit.block_id,
        word_id: hit.word_id,
        outcome: hit.outcome,
    });
}

fn ball_lost(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let game_over = state.score.lose_life();
    let lives_left = state.score.lives();
    events.push(GameEvent::LifeLost { lives_left });

    if game_over {
        log::info!("Out of lives on stage {}", state.stage);
        events.push(GameEvent::GameOver);
        set_phase(state, GamePhase::GameOver, events);
    } else {
        log::debug!("Ball lost, {lives_left} lives left");
        let spawn = state.ball_spawn_point();
        state.ball.reset(spawn);
    }
}

fn update_stage_clear(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.clear_ticks = state.clear_ticks.saturating_sub(1);
    if state.clear_ticks > 0 {
        return;
    }

    if state.stage < state.config.total_stages {
        let next = state.stage + 1;
        start_stage(state, next, events);
    } else {
        log::info!(
            "All stages cleared: final score {} (perfect: {})",
            state.score.final_score(),
            state.score.is_perfect()
        );
        set_phase(state, GamePhase::Result, events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::consts::SIM_DT;
    use crate::sim::words::{Word, WordState};
    use glam::Vec2;

    fn words() -> Vec<Word> {
        [
            (1, "apple", "りんご"),
            (2, "dog", "いぬ"),
            (3, "cat", "ねこ"),
            (4, "book", "ほん"),
            (5, "water", "みず"),
        ]
        .into_iter()
        .map(|(id, word, ja)| Word {
            id,
            word: word.into(),
            ja: ja.into(),
        })
        .collect()
    }

    fn action() -> TickInput {
        TickInput {
            action: true,
            ..Default::default()
        }
    }

    fn new_state(config: GameConfig) -> GameState {
        GameState::new(config, words(), 12345)
    }

    /// Title -> StageStart -> Playing
    fn playing_state(config: GameConfig) -> GameState {
        let mut state = new_state(config);
        tick(&mut state, &action(), SIM_DT);
        tick(&mut state, &action(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        state
    }

    /// Place the ball just below a block, heading up into it
    fn aim_at_block(state: &mut GameState, index: usize) {
        let rect = state.blocks[index].rect;
        state.ball.pos = Vec2::new(rect.center().x, rect.bottom() + 5.0);
        state.ball.vel = Vec2::new(0.0, -300.0);
    }

    fn correct_index(state: &GameState) -> usize {
        state.blocks.iter().position(|b| b.is_correct()).unwrap()
    }

    fn incorrect_index(state: &GameState) -> usize {
        state.blocks.iter().position(|b| b.is_incorrect()).unwrap()
    }

    #[test]
    fn test_title_to_stage_start() {
        let mut state = new_state(GameConfig::default());
        assert_eq!(state.phase, GamePhase::Title);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Title);

        let events = tick(&mut state, &action(), SIM_DT);
        assert_eq!(state.phase, GamePhase::StageStart);
        assert_eq!(state.stage, 1);
        assert!(events.contains(&GameEvent::PhaseChanged {
            from: GamePhase::Title,
            to: GamePhase::StageStart
        }));

        let question = state.current_question.clone().unwrap();
        assert_eq!(state.blocks.len(), 3);
        assert_eq!(state.remaining_correct_blocks, 1);
        assert!(state.door.is_locked());
        assert!(state.blocks.iter().all(|b| b.word_id == Some(question.id)));
        let correct = &state.blocks[correct_index(&state)];
        assert_eq!(correct.text, question.ja);
        assert_eq!(correct.hp(), 2);
    }

    #[test]
    fn test_blocks_centered_in_a_row() {
        let mut state = new_state(GameConfig::default());
        tick(&mut state, &action(), SIM_DT);

        let mut xs: Vec<f32> = state.blocks.iter().map(|b| b.rect.x).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(xs, vec![160.0, 490.0, 820.0]);
        assert!(state.blocks.iter().all(|b| b.rect.y == 150.0));
    }

    #[test]
    fn test_stage_setup_keeps_paddle_home() {
        let mut state = new_state(GameConfig::default());
        let input = TickInput {
            target_x: Some(300.0),
            action: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::StageStart);
        assert_eq!(state.paddle.center_x(), 640.0);
        assert_eq!(state.ball.pos.x, 640.0);
    }

    #[test]
    fn test_ball_follows_paddle_before_launch() {
        let mut state = new_state(GameConfig::default());
        tick(&mut state, &action(), SIM_DT);

        let input = TickInput {
            target_x: Some(300.0),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.paddle.center_x(), 300.0);
        assert_eq!(state.ball.pos.x, 300.0);
        assert!(!state.ball.launched);
        assert_eq!(state.ball.vel, Vec2::ZERO);
    }

    #[test]
    fn test_launch_on_action() {
        let state = playing_state(GameConfig::default());
        assert!(state.ball.launched);
        assert!(state.ball.vel.y < 0.0);
    }

    #[test]
    fn test_end_to_end_stage() {
        let mut state = playing_state(GameConfig::default());
        let correct = correct_index(&state);
        let question_id = state.current_question.as_ref().unwrap().id;

        // First hit: damaged, door stays locked
        aim_at_block(&mut state, correct);
        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::BlockHit {
                outcome: HitOutcome::Damaged,
                ..
            }
        )));
        assert!(!state.blocks[correct].destroyed);
        assert!(state.blocks[correct].is_last_hit());
        assert!(state.door.is_locked());
        assert_eq!(state.remaining_correct_blocks, 1);

        // Second hit: destroyed, door unlocks
        aim_at_block(&mut state, correct);
        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(events.contains(&GameEvent::Cue(Cue::Correct)));
        assert!(events.contains(&GameEvent::DoorUnlocked));
        assert!(state.blocks[correct].destroyed);
        assert_eq!(state.remaining_correct_blocks, 0);
        assert!(state.door.is_unlocked());
        assert_eq!(state.score.score(), 100);
        assert_eq!(state.words.state_of(question_id), Some(WordState::Correct));

        // Wrong answers are passable now
        let wrong = incorrect_index(&state);
        aim_at_block(&mut state, wrong);
        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::BlockHit { .. })));
        assert_eq!(state.ball.vel, Vec2::new(0.0, -300.0));
        assert!(state.door.is_unlocked());

        // Reach the door
        state.ball.pos = Vec2::new(640.0, 70.0);
        state.ball.vel = Vec2::new(0.0, -300.0);
        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::StageClear);
        assert!(events.contains(&GameEvent::Cue(Cue::Clear)));
        assert!(events.contains(&GameEvent::StageCleared { stage: 1 }));

        // Clear delay, then the next stage
        for _ in 0..89 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            assert_eq!(state.phase, GamePhase::StageClear);
        }
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::StageStart);
        assert_eq!(state.stage, 2);
        assert!(state.door.is_locked());
        assert_eq!(state.remaining_correct_blocks, 1);
    }

    #[test]
    fn test_wrong_answer_resets_combo_and_marks_miss() {
        let mut state = playing_state(GameConfig::default());
        let question_id = state.current_question.as_ref().unwrap().id;
        state.score.add_block_score();
        state.score.add_block_score();

        let wrong = incorrect_index(&state);
        aim_at_block(&mut state, wrong);
        let events = tick(&mut state, &TickInput::default(), SIM_DT);

        assert!(events.contains(&GameEvent::Cue(Cue::Bounce)));
        assert_eq!(state.score.combo_count(), 0);
        assert_eq!(state.words.state_of(question_id), Some(WordState::Missed));
        assert_eq!(state.words.miss_count(question_id), 1);
        // Solid while the door is locked
        assert!(state.ball.vel.y > 0.0);
        assert_eq!(state.blocks[wrong].kind, BlockKind::Incorrect);
    }

    #[test]
    fn test_fall_costs_a_life_and_respawns() {
        let mut state = playing_state(GameConfig::default());
        state.ball.pos = Vec2::new(100.0, 725.0);
        state.ball.vel = Vec2::new(0.0, 300.0);

        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(events.contains(&GameEvent::LifeLost { lives_left: 9 }));
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.ball.launched);
        assert_eq!(state.ball.pos, state.ball_spawn_point());
        assert!(!state.score.is_perfect());

        // Relaunch without leaving Playing
        let events = tick(&mut state, &action(), SIM_DT);
        assert!(events.contains(&GameEvent::Launched));
        assert!(state.ball.launched);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_game_over_and_continue() {
        let config = GameConfig {
            initial_lives: 1,
            ..GameConfig::default()
        };
        let mut state = playing_state(config);
        state.score.add_block_score();
        state.ball.pos = Vec2::new(100.0, 725.0);
        state.ball.vel = Vec2::new(0.0, 300.0);

        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(events.contains(&GameEvent::GameOver));
        assert_eq!(state.phase, GamePhase::GameOver);

        // Nothing moves while waiting
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);

        tick(&mut state, &action(), SIM_DT);
        assert_eq!(state.phase, GamePhase::StageStart);
        assert_eq!(state.stage, 1);
        assert_eq!(state.score.lives(), 1);
        assert_eq!(state.score.score(), 100);
        assert!(!state.score.is_perfect());
        assert!(state.door.is_locked());
    }

    fn clear_stage(state: &mut GameState) {
        state.remaining_correct_blocks = 0;
        state.door.unlock();
        state.ball.pos = Vec2::new(640.0, 70.0);
        state.ball.vel = Vec2::new(0.0, -300.0);
        tick(state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::StageClear);
        for _ in 0..state.config.stage_clear_ticks() {
            tick(state, &TickInput::default(), SIM_DT);
        }
    }

    #[test]
    fn test_last_stage_goes_to_result_and_restarts() {
        let config = GameConfig {
            total_stages: 1,
            ..GameConfig::default()
        };
        let mut state = playing_state(config);
        state.score.add_block_score();
        clear_stage(&mut state);
        assert_eq!(state.phase, GamePhase::Result);
        assert_eq!(state.score.final_score(), 120);

        tick(&mut state, &action(), SIM_DT);
        assert_eq!(state.phase, GamePhase::StageStart);
        assert_eq!(state.stage, 1);
        assert_eq!(state.score.score(), 0);
        assert!(!state.hard_mode);
    }

    #[test]
    fn test_hard_mode_restart_from_result() {
        let config = GameConfig {
            total_stages: 1,
            ..GameConfig::default()
        };
        let mut state = playing_state(config);
        clear_stage(&mut state);
        assert_eq!(state.phase, GamePhase::Result);

        let toggle = TickInput {
            toggle_hard_mode: true,
            ..Default::default()
        };
        tick(&mut state, &toggle, SIM_DT);
        assert!(state.hard_mode);
        assert_eq!(state.phase, GamePhase::StageStart);
        assert_eq!(state.words.summary().unseen, 5);
    }

    #[test]
    fn test_hard_mode_toggle_mid_game() {
        let mut state = playing_state(GameConfig::default());
        let toggle = TickInput {
            toggle_hard_mode: true,
            ..Default::default()
        };
        tick(&mut state, &toggle, SIM_DT);
        assert!(state.hard_mode);
        assert_eq!(state.phase, GamePhase::Playing);
        tick(&mut state, &toggle, SIM_DT);
        assert!(!state.hard_mode);
    }

    #[test]
    fn test_empty_word_list_degrades() {
        let mut state = GameState::new(GameConfig::default(), Vec::new(), 1);
        tick(&mut state, &action(), SIM_DT);
        assert_eq!(state.phase, GamePhase::StageStart);
        assert!(state.current_question.is_none());
        assert!(state.blocks.is_empty());

        let events = tick(&mut state, &action(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(events.contains(&GameEvent::DoorUnlocked));
    }

    #[test]
    fn test_too_few_distractors() {
        let two = words().into_iter().take(2).collect();
        let mut state = GameState::new(GameConfig::default(), two, 3);
        tick(&mut state, &action(), SIM_DT);
        assert_eq!(state.blocks.len(), 2);
        assert_eq!(state.remaining_correct_blocks, 1);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = new_state(GameConfig::default());
        let mut state2 = new_state(GameConfig::default());

        let inputs = [
            action(),
            TickInput {
                target_x: Some(500.0),
                ..Default::default()
            },
            action(),
            TickInput {
                target_x: Some(700.0),
                ..Default::default()
            },
            TickInput::default(),
        ];

        for input in &inputs {
            let e1 = tick(&mut state1, input, SIM_DT);
            let e2 = tick(&mut state2, input, SIM_DT);
            assert_eq!(e1, e2);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.ball.pos, state2.ball.pos);
        assert_eq!(state1.ball.vel, state2.ball.vel);
        assert_eq!(state1.current_question, state2.current_question);
    }
}
