//! Session tests - whole campaigns driven through a scripted frontend

use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};

use minehunt::mh_campaign::MAX_LEVELS;
use minehunt::mh_session::play_level;
use minehunt::{
    Action, Banner, BoardGeometry, CampaignOutcome, Config, Control, Frontend, Grid, InputEvent,
    Level, LevelEnd, LevelSettings, LevelState, LossReason, Pos, Screen, run_session,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// What the bot does when it first sees a level
#[derive(Debug, Clone, Copy)]
enum Plan {
    ClearAll,
    HitMine,
    OneSafeThenIdle,
    PauseThenQuit,
    PauseFor(usize),
}

/// Frontend that plays by peeking at the grid it is asked to draw
struct Bot {
    now: Instant,
    step: Duration,
    geometry: BoardGeometry,
    selections: VecDeque<Vec<InputEvent>>, // One batch per selector visit, then Quit
    replies: VecDeque<InputEvent>,         // One event per replay prompt, then Quit
    plans: Vec<Plan>,                      // Indexed by levels started so far
    pending: VecDeque<Vec<InputEvent>>,
    planned: Option<u32>,
    polls: usize,
    holds: usize,
    quit_on_hold: Option<usize>,
    selector_visits: usize,
    banners: Vec<Banner>,
    replay_prompts: Vec<Banner>,
    levels_seen: Vec<(u32, usize, usize)>,
    paused_frames: usize,
}

impl Bot {
    fn new(selection: Vec<InputEvent>, plans: Vec<Plan>) -> Self {
        Bot {
            now: Instant::now(),
            step: Duration::from_millis(20),
            geometry: BoardGeometry::TERMINAL,
            selections: VecDeque::from([selection]),
            replies: VecDeque::new(),
            plans,
            pending: VecDeque::new(),
            planned: None,
            polls: 0,
            holds: 0,
            quit_on_hold: None,
            selector_visits: 0,
            banners: Vec::new(),
            replay_prompts: Vec::new(),
            levels_seen: Vec::new(),
            paused_frames: 0,
        }
    }

    fn with_step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    fn then_select(mut self, selection: Vec<InputEvent>) -> Self {
        self.selections.push_back(selection);
        self
    }

    fn with_replies(mut self, replies: Vec<InputEvent>) -> Self {
        self.replies = replies.into();
        self
    }

    /// Deliver a global quit during the n-th banner hold (0-based)
    fn quit_on_hold(mut self, n: usize) -> Self {
        self.quit_on_hold = Some(n);
        self
    }

    fn click(&self, pos: Pos) -> InputEvent {
        let (x, y) = self.geometry.cell_origin(pos);
        InputEvent::Click { x, y }
    }

    fn plan_level(&mut self, level: &Level) {
        let n = level.number();
        self.planned = Some(n);
        let plan = self.plans.get(self.levels_seen.len()).copied().unwrap_or(Plan::ClearAll);
        self.levels_seen.push((n, level.size(), level.grid().mine_count()));

        let grid = level.grid();
        let safe: Vec<InputEvent> = grid.safe_positions().map(|p| self.click(p)).collect();
        let first_safe = safe[0];
        match plan {
            Plan::ClearAll => self.pending.push_back(safe),
            Plan::HitMine => {
                let mine = grid.mine_positions().next().expect("level has a mine");
                let click = self.click(mine);
                self.pending.push_back(vec![click]);
            }
            Plan::OneSafeThenIdle => self.pending.push_back(vec![first_safe]),
            Plan::PauseThenQuit => {
                self.pending.push_back(vec![InputEvent::Key(Action::Pause)]);
                self.pending.push_back(vec![InputEvent::Key(Action::Quit)]);
            }
            Plan::PauseFor(polls) => {
                self.pending.push_back(vec![first_safe]);
                self.pending.push_back(vec![InputEvent::Key(Action::Pause)]);
                for _ in 0..polls {
                    self.pending.push_back(Vec::new());
                }
                self.pending.push_back(vec![InputEvent::Key(Action::Resume)]);
                self.pending.push_back(safe);
            }
        }
    }
}

impl Frontend for Bot {
    fn now(&self) -> Instant {
        self.now
    }

    fn geometry(&self) -> BoardGeometry {
        self.geometry
    }

    fn poll(&mut self, _timeout: Duration) -> io::Result<Vec<InputEvent>> {
        self.polls += 1;
        if self.polls > 100_000 {
            return Ok(vec![InputEvent::Quit]);
        }
        self.now += self.step;
        Ok(self.pending.pop_front().unwrap_or_default())
    }

    fn draw(&mut self, screen: Screen<'_>) -> io::Result<()> {
        match screen {
            Screen::MineSelect(_) => {
                if self.pending.is_empty() {
                    self.selector_visits += 1;
                    let batch = self.selections.pop_front();
                    self.pending.push_back(batch.unwrap_or_else(|| vec![InputEvent::Quit]));
                }
            }
            Screen::Playing { level, .. } => {
                if self.planned != Some(level.number()) {
                    self.plan_level(level);
                }
            }
            Screen::Paused { .. } => self.paused_frames += 1,
            Screen::Banner(banner) => self.banners.push(banner),
            Screen::Replay(banner) => {
                // a new campaign restarts level numbering
                self.planned = None;
                if self.pending.is_empty() {
                    self.replay_prompts.push(banner);
                    let reply = self.replies.pop_front().unwrap_or(InputEvent::Quit);
                    self.pending.push_back(vec![reply]);
                }
            }
        }
        Ok(())
    }

    fn hold(&mut self, duration: Duration) -> io::Result<Control> {
        let index = self.holds;
        self.holds += 1;
        self.now += duration;
        if self.quit_on_hold == Some(index) {
            return Ok(Control::Exit);
        }
        Ok(Control::Continue)
    }
}

fn config(pause_freezes_timer: bool) -> Config {
    Config {
        default_mines: 5,
        language: "en".to_string(),
        ascii_icons: true,
        pause_freezes_timer,
        seed: None,
    }
}

fn confirm() -> Vec<InputEvent> {
    vec![InputEvent::Key(Action::Confirm)]
}

#[test]
fn test_campaign_lost_on_third_level() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut bot = Bot::new(confirm(), vec![Plan::ClearAll, Plan::ClearAll, Plan::HitMine]);

    let outcomes = run_session(&mut bot, &config(true), &mut rng).unwrap();

    assert_eq!(
        outcomes,
        vec![CampaignOutcome::Defeat {
            level: 3,
            reason: LossReason::Mine,
            coins: 0
        }]
    );
    assert_eq!(
        bot.banners,
        vec![
            Banner::LevelComplete,
            Banner::LevelComplete,
            Banner::HitMine,
            Banner::GameOver { coins: 0 }
        ]
    );
    assert_eq!(bot.levels_seen, vec![(1, 6, 5), (2, 7, 5), (3, 8, 5)]);
}

#[test]
fn test_all_levels_cleared_is_victory() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut bot = Bot::new(confirm(), Vec::new());

    let outcomes = run_session(&mut bot, &config(true), &mut rng).unwrap();

    assert_eq!(outcomes, vec![CampaignOutcome::Victory { coins: 0 }]);
    assert_eq!(bot.levels_seen.len(), MAX_LEVELS as usize);
    assert_eq!(bot.levels_seen.last(), Some(&(MAX_LEVELS, 12, 5)));
    let completes = bot.banners.iter().filter(|b| **b == Banner::LevelComplete).count();
    assert_eq!(completes, MAX_LEVELS as usize);
    assert_eq!(bot.banners.last(), Some(&Banner::Victory { coins: 0 }));
}

#[test]
fn test_selector_sets_mines_for_every_level() {
    let mut rng = StdRng::seed_from_u64(21);
    let selection = vec![
        InputEvent::Key(Action::Up),
        InputEvent::Key(Action::Up),
        InputEvent::Key(Action::Confirm),
    ];
    let mut bot = Bot::new(selection, vec![Plan::ClearAll, Plan::HitMine]);

    run_session(&mut bot, &config(true), &mut rng).unwrap();

    assert_eq!(bot.levels_seen, vec![(1, 6, 7), (2, 7, 7)]);
}

#[test]
fn test_quit_from_selector() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut bot = Bot::new(vec![InputEvent::Quit], Vec::new());

    let outcomes = run_session(&mut bot, &config(true), &mut rng).unwrap();

    assert!(outcomes.is_empty());
    assert!(bot.banners.is_empty());
    assert!(bot.levels_seen.is_empty());
}

#[test]
fn test_idle_player_times_out() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut bot =
        Bot::new(confirm(), vec![Plan::OneSafeThenIdle]).with_step(Duration::from_secs(1));

    let outcomes = run_session(&mut bot, &config(true), &mut rng).unwrap();

    assert_eq!(
        outcomes,
        vec![CampaignOutcome::Defeat {
            level: 1,
            reason: LossReason::Timeout,
            coins: 0
        }]
    );
    assert_eq!(bot.banners, vec![Banner::TimesUp, Banner::GameOver { coins: 0 }]);
}

#[test]
fn test_quit_from_pause_ends_session() {
    let mut rng = StdRng::seed_from_u64(6);
    let mut bot = Bot::new(confirm(), vec![Plan::ClearAll, Plan::PauseThenQuit]);

    let outcomes = run_session(&mut bot, &config(true), &mut rng).unwrap();

    assert_eq!(outcomes, vec![CampaignOutcome::Quit { coins: 0 }]);
    assert_eq!(bot.paused_frames, 1);
    assert_eq!(bot.banners, vec![Banner::LevelComplete]);
}

#[test]
fn test_frozen_pause_survives_long_break() {
    let mut rng = StdRng::seed_from_u64(12);
    let plans = vec![Plan::PauseFor(300), Plan::HitMine];
    let mut bot = Bot::new(confirm(), plans).with_step(Duration::from_secs(1));

    let outcomes = run_session(&mut bot, &config(true), &mut rng).unwrap();

    assert_eq!(
        outcomes,
        vec![CampaignOutcome::Defeat {
            level: 2,
            reason: LossReason::Mine,
            coins: 0
        }]
    );
    assert!(bot.paused_frames >= 300);
}

#[test]
fn test_running_pause_times_out_on_resume() {
    let mut rng = StdRng::seed_from_u64(12);
    let plans = vec![Plan::PauseFor(300)];
    let mut bot = Bot::new(confirm(), plans).with_step(Duration::from_secs(1));

    let outcomes = run_session(&mut bot, &config(false), &mut rng).unwrap();

    assert_eq!(
        outcomes,
        vec![CampaignOutcome::Defeat {
            level: 1,
            reason: LossReason::Timeout,
            coins: 0
        }]
    );
}

fn small_level() -> Level {
    let grid = Grid::from_mines(2, &[(0, 0)]).unwrap();
    Level::new(1, grid, 0, LevelSettings::default(), BoardGeometry::TERMINAL)
}

#[test]
fn test_header_click_does_not_reveal() {
    let mut level = small_level();
    let mut bot = Bot::new(Vec::new(), Vec::new());
    bot.planned = Some(1);
    bot.pending.push_back(vec![InputEvent::Click { x: 2, y: 0 }]);
    bot.pending.push_back(vec![InputEvent::Quit]);

    let report = play_level(&mut bot, &mut level).unwrap();

    assert_eq!(report, None);
    assert!(level.revealed().is_empty());
}

#[test]
fn test_events_after_win_are_dropped() {
    let mut level = small_level();
    let mut bot = Bot::new(Vec::new(), Vec::new());
    bot.planned = Some(1);
    let batch = vec![
        InputEvent::Click { x: 2, y: 0 },
        bot.click((0, 1)),
        bot.click((1, 0)),
        bot.click((1, 1)),
        bot.click((0, 0)),
    ];
    bot.pending.push_back(batch);

    let report = play_level(&mut bot, &mut level).unwrap().unwrap();

    assert!(report.is_won());
    assert_eq!(report.end, LevelEnd::Won);
    assert_eq!(level.revealed().len(), 3);
    assert_eq!(bot.banners, vec![Banner::LevelComplete]);
}

#[test]
fn test_quit_after_win_in_same_batch_exits() {
    let mut level = small_level();
    let mut bot = Bot::new(Vec::new(), Vec::new());
    bot.planned = Some(1);
    let batch = vec![
        bot.click((0, 1)),
        bot.click((1, 0)),
        bot.click((1, 1)),
        InputEvent::Key(Action::Up),
        InputEvent::Quit,
    ];
    bot.pending.push_back(batch);

    let report = play_level(&mut bot, &mut level).unwrap();

    assert_eq!(report, None);
    assert_eq!(level.state(), LevelState::Won);
    assert!(bot.banners.is_empty());
}

#[test]
fn test_quit_during_level_banner_ends_campaign() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut bot = Bot::new(confirm(), vec![Plan::ClearAll]).quit_on_hold(0);

    let outcomes = run_session(&mut bot, &config(true), &mut rng).unwrap();

    assert_eq!(outcomes, vec![CampaignOutcome::Quit { coins: 0 }]);
    assert_eq!(bot.levels_seen.len(), 1);
    assert_eq!(bot.banners, vec![Banner::LevelComplete]);
    assert!(bot.replay_prompts.is_empty());
}

#[test]
fn test_quit_during_final_banner_skips_replay() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut bot = Bot::new(confirm(), vec![Plan::HitMine]).quit_on_hold(1);

    let outcomes = run_session(&mut bot, &config(true), &mut rng).unwrap();

    assert_eq!(
        outcomes,
        vec![CampaignOutcome::Defeat {
            level: 1,
            reason: LossReason::Mine,
            coins: 0
        }]
    );
    assert_eq!(bot.banners, vec![Banner::HitMine, Banner::GameOver { coins: 0 }]);
    assert!(bot.replay_prompts.is_empty());
}

#[test]
fn test_restart_reuses_mine_count() {
    let mut rng = StdRng::seed_from_u64(17);
    let selection = vec![InputEvent::Key(Action::Up), InputEvent::Key(Action::Confirm)];
    let mut bot = Bot::new(selection, vec![Plan::ClearAll, Plan::HitMine, Plan::HitMine])
        .with_replies(vec![InputEvent::Key(Action::Confirm)]);

    let outcomes = run_session(&mut bot, &config(true), &mut rng).unwrap();

    let lost = |level| CampaignOutcome::Defeat {
        level,
        reason: LossReason::Mine,
        coins: 0,
    };
    assert_eq!(outcomes, vec![lost(2), lost(1)]);
    assert_eq!(bot.levels_seen, vec![(1, 6, 6), (2, 7, 6), (1, 6, 6)]);
    assert_eq!(bot.selector_visits, 1);
    assert_eq!(bot.replay_prompts.len(), 2);
}

#[test]
fn test_menu_returns_to_selector() {
    let mut rng = StdRng::seed_from_u64(23);
    let reselect = vec![
        InputEvent::Key(Action::Down),
        InputEvent::Key(Action::Down),
        InputEvent::Key(Action::Confirm),
    ];
    let mut bot = Bot::new(confirm(), vec![Plan::HitMine, Plan::HitMine])
        .then_select(reselect)
        .with_replies(vec![InputEvent::Key(Action::Menu)]);

    let outcomes = run_session(&mut bot, &config(true), &mut rng).unwrap();

    assert_eq!(outcomes.len(), 2);
    assert_eq!(bot.levels_seen, vec![(1, 6, 5), (1, 6, 3)]);
    assert_eq!(bot.selector_visits, 2);
}

#[test]
fn test_victory_then_replay_quit() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut bot = Bot::new(confirm(), Vec::new()).with_replies(vec![InputEvent::Key(Action::Quit)]);

    let outcomes = run_session(&mut bot, &config(true), &mut rng).unwrap();

    assert_eq!(outcomes, vec![CampaignOutcome::Victory { coins: 0 }]);
    assert_eq!(bot.replay_prompts, vec![Banner::Victory { coins: 0 }]);
}
