// Frontend-agnostic control loops
// Mine selection, the per-level loop, the narrative banners and the replay prompt

use rand::Rng;
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::mh_campaign::{Campaign, CampaignOutcome, MineSelector};
use crate::mh_config::Config;
use crate::mh_level::{
    Action, BoardGeometry, Control, InputEvent, Level, LevelEnd, LevelReport, LevelState,
    LossReason,
};

/// Poll timeout per loop iteration (60 frames per second)
pub const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// How long a level result stays on screen
pub const LEVEL_BANNER_HOLD: Duration = Duration::from_secs(2);

/// How long the final campaign result stays on screen
pub const CAMPAIGN_BANNER_HOLD: Duration = Duration::from_secs(3);

/// Full-screen narrative messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    HitMine,
    LevelComplete,
    TimesUp,
    GameOver { coins: u64 },
    Victory { coins: u64 },
}

impl Banner {
    pub fn for_level(report: &LevelReport) -> Self {
        match report.end {
            LevelEnd::Won => Banner::LevelComplete,
            LevelEnd::Lost(LossReason::Mine) => Banner::HitMine,
            LevelEnd::Lost(LossReason::Timeout) => Banner::TimesUp,
        }
    }

    /// None for an aborted session, which ends without a banner
    pub fn for_campaign(outcome: &CampaignOutcome) -> Option<Self> {
        match *outcome {
            CampaignOutcome::Victory { coins } => Some(Banner::Victory { coins }),
            CampaignOutcome::Defeat { coins, .. } => Some(Banner::GameOver { coins }),
            CampaignOutcome::Quit { .. } => None,
        }
    }
}

/// Choice offered once a campaign has ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replay {
    Restart, // Same mine count, back to level 1
    Menu,    // Back to the mine selector
    Quit,
}

impl Replay {
    pub fn from_event(event: InputEvent) -> Option<Self> {
        match event {
            InputEvent::Quit | InputEvent::Key(Action::Quit) => Some(Replay::Quit),
            InputEvent::Key(Action::Confirm | Action::Resume) => Some(Replay::Restart),
            InputEvent::Key(Action::Menu) => Some(Replay::Menu),
            _ => None,
        }
    }
}

/// One frame worth of state for the rendering side
#[derive(Debug, Clone, Copy)]
pub enum Screen<'a> {
    MineSelect(&'a MineSelector),
    Playing { level: &'a Level, now: Instant },
    Paused { level: &'a Level },
    Banner(Banner),
    Replay(Banner),
}

/// Rendering and input collaborator
pub trait Frontend {
    /// Clock used for every timer decision
    fn now(&self) -> Instant;

    /// Layout used to map clicks to cells
    fn geometry(&self) -> BoardGeometry;

    /// Queued input, waiting at most `timeout` for the first event
    fn poll(&mut self, timeout: Duration) -> io::Result<Vec<InputEvent>>;

    fn draw(&mut self, screen: Screen<'_>) -> io::Result<()>;

    /// Keep the current frame up for `duration`, discarding input
    /// Returns `Control::Exit` as soon as a global quit arrives
    fn hold(&mut self, duration: Duration) -> io::Result<Control>;
}

/// Run the pre-game selector; None if the player quit
pub fn select_mines<F>(frontend: &mut F, initial: usize) -> io::Result<Option<usize>>
where
    F: Frontend + ?Sized,
{
    let mut selector = MineSelector::new(initial);
    loop {
        frontend.draw(Screen::MineSelect(&selector))?;
        for event in frontend.poll(FRAME_INTERVAL)? {
            match event {
                InputEvent::Quit => return Ok(None),
                InputEvent::Key(action) => {
                    if selector.handle(action) {
                        info!(mines = selector.num_mines(), "mine count selected");
                        return Ok(Some(selector.num_mines()));
                    }
                }
                InputEvent::Click { .. } => {}
            }
        }
    }
}

/// Drive one level to completion; None if the player quit
/// Each iteration handles queued events in order, then checks the timer, then draws.
/// Once the level ends the rest of the batch is dropped, except a global quit.
pub fn play_level<F>(frontend: &mut F, level: &mut Level) -> io::Result<Option<LevelReport>>
where
    F: Frontend + ?Sized,
{
    loop {
        let mut events = frontend.poll(FRAME_INTERVAL)?.into_iter();
        while let Some(event) = events.next() {
            if level.handle(event, frontend.now()) == Control::Exit {
                info!(level = level.number(), "quit requested");
                return Ok(None);
            }
            if level.state().is_finished() {
                if events.any(|e| e == InputEvent::Quit) {
                    info!(level = level.number(), "quit requested after level end");
                    return Ok(None);
                }
                break;
            }
        }

        let now = frontend.now();
        level.tick(now);
        if let Some(report) = level.report() {
            debug!(?report, "level finished");
            frontend.draw(Screen::Banner(Banner::for_level(&report)))?;
            if frontend.hold(LEVEL_BANNER_HOLD)? == Control::Exit {
                info!(level = level.number(), "quit during level banner");
                return Ok(None);
            }
            return Ok(Some(report));
        }

        let level = &*level;
        let screen = match level.state() {
            LevelState::Paused => Screen::Paused { level },
            _ => Screen::Playing { level, now },
        };
        frontend.draw(screen)?;
    }
}

/// Play levels until the campaign is lost, won or abandoned
pub fn run_campaign<F, R>(
    frontend: &mut F,
    campaign: &mut Campaign,
    rng: &mut R,
) -> io::Result<CampaignOutcome>
where
    F: Frontend + ?Sized,
    R: Rng + ?Sized,
{
    loop {
        let mut level = campaign.start_level(rng, frontend.geometry());
        let Some(report) = play_level(frontend, &mut level)? else {
            return Ok(CampaignOutcome::Quit {
                coins: campaign.state().coins,
            });
        };
        if let Some(outcome) = campaign.finish_level(report) {
            return Ok(outcome);
        }
    }
}

/// Wait for the player's choice after a finished campaign
pub fn ask_replay<F: Frontend + ?Sized>(frontend: &mut F, banner: Banner) -> io::Result<Replay> {
    loop {
        frontend.draw(Screen::Replay(banner))?;
        let choice = frontend.poll(FRAME_INTERVAL)?.into_iter().find_map(Replay::from_event);
        if let Some(choice) = choice {
            info!(?choice, "replay choice");
            return Ok(choice);
        }
    }
}

/// Whole session: selector, campaigns and the closing banners
/// After each finished campaign the player may restart, pick a new mine count or quit.
/// Returns every campaign outcome in order; an aborted campaign ends as `Quit`.
pub fn run_session<F, R>(
    frontend: &mut F,
    cfg: &Config,
    rng: &mut R,
) -> io::Result<Vec<CampaignOutcome>>
where
    F: Frontend + ?Sized,
    R: Rng + ?Sized,
{
    let mut outcomes = Vec::new();
    let mut num_mines = cfg.default_mines;
    let mut choose_mines = true;
    loop {
        if choose_mines {
            match select_mines(frontend, num_mines)? {
                Some(n) => num_mines = n,
                None => return Ok(outcomes),
            }
        }

        let mut campaign = Campaign::new(num_mines, cfg.level_settings());
        let outcome = run_campaign(frontend, &mut campaign, rng)?;
        outcomes.push(outcome);
        let Some(banner) = Banner::for_campaign(&outcome) else {
            return Ok(outcomes);
        };
        frontend.draw(Screen::Banner(banner))?;
        if frontend.hold(CAMPAIGN_BANNER_HOLD)? == Control::Exit {
            return Ok(outcomes);
        }

        match ask_replay(frontend, banner)? {
            Replay::Restart => choose_mines = false,
            Replay::Menu => choose_mines = true,
            Replay::Quit => return Ok(outcomes),
        }
    }
}
