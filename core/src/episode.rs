use core::mem;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Reward for opening the last safe cell.
pub const WIN_REWARD: Reward = 50;

/// Reward for stepping on a mine.
pub const FAIL_REWARD: Reward = -10;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodeOutcome {
    Won,
    Lost,
    StepsExhausted,
}

/// Valid transitions:
/// - AwaitingFirstMove -> InProgress
/// - InProgress -> Terminal
///
/// `reset` may start over from any phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodePhase {
    /// First-move-safe mode only, no minefield exists yet
    AwaitingFirstMove,
    InProgress(Minefield),
    /// Absorbing until the next reset
    Terminal(Minefield, EpisodeOutcome),
}

impl EpisodePhase {
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(..))
    }

    pub const fn outcome(&self) -> Option<EpisodeOutcome> {
        match self {
            Self::Terminal(_, outcome) => Some(*outcome),
            _ => None,
        }
    }

    pub const fn minefield(&self) -> Option<&Minefield> {
        match self {
            Self::AwaitingFirstMove => None,
            Self::InProgress(field) | Self::Terminal(field, _) => Some(field),
        }
    }
}

/// Diagnostic side channel of a step. Exposes the hidden layout, not meant for the agent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInfo {
    pub map: MineLayout,
}

impl StepInfo {
    /// Renders the info as `{"map": [[0|1, ...], ...]}`.
    pub fn to_json(&self) -> serde_json::Value {
        let map: Vec<Vec<u8>> = self
            .map
            .view()
            .rows()
            .into_iter()
            .map(|row| row.iter().map(|&is_mine| u8::from(is_mine)).collect())
            .collect();
        serde_json::json!({ "map": map })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepResult {
    pub observation: Array2<i8>,
    pub reward: Reward,
    pub terminal: bool,
    pub info: StepInfo,
}

/// Runs episodes: owns the configuration, the field generator and the state of the current episode.
#[derive(Clone, Debug)]
pub struct EpisodeController<G = RandomFieldGenerator> {
    config: GameConfig,
    generator: G,
    phase: EpisodePhase,
    state: GameState,
}

impl EpisodeController<RandomFieldGenerator> {
    /// Controller with a random generator, seeded from `config.seed` when present.
    pub fn new(config: GameConfig) -> Result<Self> {
        let generator = match config.seed {
            Some(seed) => RandomFieldGenerator::seed_from_u64(seed),
            None => RandomFieldGenerator::from_entropy(),
        };
        Self::with_generator(config, generator)
    }

    /// Reseeds the generator, then resets.
    pub fn reset_with_seed(&mut self, seed: u64) -> Result<Array2<i8>> {
        self.generator.reseed(seed);
        self.reset()
    }
}

impl<G: FieldGenerator> EpisodeController<G> {
    /// Validates `config` and starts the first episode.
    pub fn with_generator(config: GameConfig, generator: G) -> Result<Self> {
        config.validate()?;
        let mut controller = Self {
            config,
            generator,
            phase: EpisodePhase::AwaitingFirstMove,
            state: GameState::new(&config),
        };
        controller.reset()?;
        Ok(controller)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> &EpisodePhase {
        &self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn minefield(&self) -> Option<&Minefield> {
        self.phase.minefield()
    }

    pub fn steps_used(&self) -> u32 {
        self.state.steps().used()
    }

    pub fn observation(&self) -> Array2<i8> {
        self.state.visibility().to_array()
    }

    pub fn render<R: RenderHook>(&self, hook: &mut R) {
        hook.render(self.state.visibility().view());
    }

    /// Starts a new episode and returns its all-unopened observation.
    pub fn reset(&mut self) -> Result<Array2<i8>> {
        let phase = if self.config.prevent_first_bomb {
            EpisodePhase::AwaitingFirstMove
        } else {
            EpisodePhase::InProgress(self.generator.generate(&self.config, None)?)
        };
        self.phase = phase;
        self.state = GameState::new(&self.config);
        log::debug!(
            "Reset {}x{} board with {} mines, deferred generation: {}",
            self.config.height,
            self.config.width,
            self.config.num_mines,
            self.config.prevent_first_bomb
        );
        Ok(self.observation())
    }

    /// Opens the cell named by `action`.
    ///
    /// An invalid action fails before anything is mutated.
    pub fn step(&mut self, action: impl Into<Action>) -> Result<StepResult> {
        let action: Action = action.into();
        let coords = action.validate(&self.config)?;

        let field = match mem::replace(&mut self.phase, EpisodePhase::AwaitingFirstMove) {
            EpisodePhase::AwaitingFirstMove => {
                self.generator.generate(&self.config, Some(coords))?
            }
            EpisodePhase::InProgress(field) => field,
            EpisodePhase::Terminal(field, outcome) => {
                log::warn!("Step at {:?} after episode ended ({:?})", coords, outcome);
                let result = self.result(&field, 0, true);
                self.phase = EpisodePhase::Terminal(field, outcome);
                return Ok(result);
            }
        };

        let (reward, outcome) = self.advance(&field, coords);
        let terminal = outcome.is_some();
        log::debug!(
            "Step {} at {:?}: reward {}, outcome {:?}",
            self.state.steps().used(),
            coords,
            reward,
            outcome
        );

        let result = self.result(&field, reward, terminal);
        self.phase = match outcome {
            Some(outcome) => EpisodePhase::Terminal(field, outcome),
            None => EpisodePhase::InProgress(field),
        };
        Ok(result)
    }

    fn advance(&mut self, field: &Minefield, coords: Coord2) -> (Reward, Option<EpisodeOutcome>) {
        if !self.state.steps_mut().consume() {
            log::debug!("Step budget of {} exhausted", self.state.steps().max());
            return (0, Some(EpisodeOutcome::StepsExhausted));
        }

        if field.contains_mine(coords) {
            return (FAIL_REWARD, Some(EpisodeOutcome::Lost));
        }

        // redundant click, the budget unit is still spent
        if self.state.visibility().is_opened(coords) {
            return (0, None);
        }

        let opened_before = self.state.count_opened();
        reveal(self.state.visibility_mut(), field.counts(), coords);
        let opened_after = self.state.count_opened();

        if self.state.is_fully_cleared(self.config.safe_cells()) {
            (WIN_REWARD, Some(EpisodeOutcome::Won))
        } else {
            (Reward::from(opened_after - opened_before), None)
        }
    }

    fn result(&self, field: &Minefield, reward: Reward, terminal: bool) -> StepResult {
        StepResult {
            observation: self.observation(),
            reward,
            terminal,
            info: StepInfo {
                map: field.layout().clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preset(
        size: Coord2,
        mines: &[Coord2],
        prevent_first_bomb: bool,
    ) -> EpisodeController<PresetFieldGenerator> {
        let config = GameConfig::new(size.0, size.1, mines.len() as CellCount, prevent_first_bomb)
            .unwrap();
        let generator = PresetFieldGenerator::from_mine_coords(size, mines).unwrap();
        EpisodeController::with_generator(config, generator).unwrap()
    }

    #[test]
    fn single_click_cascade_wins_three_by_three() {
        let mut env = preset((3, 3), &[(2, 2)], false);
        assert_eq!(env.reset().unwrap(), Array2::from_elem([3, 3], UNOPENED));

        let result = env.step((0u8, 0u8)).unwrap();

        assert_eq!(result.reward, WIN_REWARD);
        assert!(result.terminal);
        assert_eq!(result.observation[[0, 0]], 0);
        assert_eq!(result.observation[[1, 1]], 1);
        assert_eq!(result.observation[[2, 2]], UNOPENED);
        assert_eq!(env.phase().outcome(), Some(EpisodeOutcome::Won));
    }

    #[test]
    fn empty_two_by_two_is_won_in_one_step() {
        let config = GameConfig::new(2, 2, 0, true).unwrap().with_seed(5);
        let mut env = EpisodeController::new(config).unwrap();

        let result = env.step((0u8, 0u8)).unwrap();

        assert_eq!(result.reward, WIN_REWARD);
        assert!(result.terminal);
        assert_eq!(result.observation, Array2::<i8>::zeros([2, 2]));
    }

    #[test]
    fn out_of_bounds_action_is_rejected_without_mutation() {
        let config = GameConfig::new(3, 3, 1, true).unwrap().with_seed(1);
        let mut env = EpisodeController::new(config).unwrap();

        assert_eq!(env.step((5i64, 5i64)), Err(GameError::InvalidAction));
        assert_eq!(env.step((-1i64, 0i64)), Err(GameError::InvalidAction));
        assert_eq!(env.phase(), &EpisodePhase::AwaitingFirstMove);
        assert_eq!(env.steps_used(), 0);
    }

    #[test]
    fn safe_start_refuses_layout_mined_at_first_click() {
        let mut env = preset((2, 2), &[(0, 0)], true);

        assert_eq!(
            env.step((0u8, 0u8)),
            Err(GameError::InvalidConfiguration(
                ConfigProblem::MineOnExcludedCell
            ))
        );
        assert_eq!(env.phase(), &EpisodePhase::AwaitingFirstMove);
        assert_eq!(env.steps_used(), 0);
        assert_eq!(env.observation(), Array2::from_elem([2, 2], UNOPENED));
    }

    #[test]
    fn stepping_on_mine_loses() {
        let mut env = preset((2, 2), &[(0, 0)], false);

        let result = env.step((0u8, 0u8)).unwrap();

        assert_eq!(result.reward, FAIL_REWARD);
        assert!(result.terminal);
        assert_eq!(env.phase().outcome(), Some(EpisodeOutcome::Lost));
        assert!(result.info.map.contains_mine((0, 0)));
    }

    #[test]
    fn terminal_phase_absorbs_further_steps() {
        let mut env = preset((2, 2), &[(0, 0)], false);
        env.step((0u8, 0u8)).unwrap();
        let used = env.steps_used();

        let result = env.step((1u8, 1u8)).unwrap();

        assert_eq!(result.reward, 0);
        assert!(result.terminal);
        assert_eq!(result.observation, Array2::from_elem([2, 2], UNOPENED));
        assert_eq!(env.steps_used(), used);
    }

    #[test]
    fn redundant_click_still_consumes_budget() {
        let mut env = preset((1, 3), &[(0, 1)], false);

        let first = env.step((0u8, 0u8)).unwrap();
        assert_eq!((first.reward, first.terminal), (1, false));

        let second = env.step((0u8, 0u8)).unwrap();
        assert_eq!((second.reward, second.terminal), (0, false));
        assert_eq!(env.steps_used(), 2);
    }

    #[test]
    fn exhausted_budget_terminates_without_mutation() {
        let mut env = preset((1, 3), &[(0, 1)], false);
        assert_eq!(env.state().steps().max(), 4);

        for _ in 0..4 {
            assert!(!env.step((0u8, 0u8)).unwrap().terminal);
        }
        let before = env.observation();

        let result = env.step((0u8, 2u8)).unwrap();

        assert_eq!((result.reward, result.terminal), (0, true));
        assert_eq!(result.observation, before);
        assert_eq!(result.observation[[0, 2]], UNOPENED);
        assert_eq!(env.steps_used(), 4);
        assert_eq!(env.phase().outcome(), Some(EpisodeOutcome::StepsExhausted));
    }

    #[test]
    fn first_move_is_always_safe() {
        let mut env = EpisodeController::new(GameConfig::beginner()).unwrap();

        for seed in 0..100 {
            env.reset_with_seed(seed).unwrap();
            assert!(env.minefield().is_none());

            let result = env.step((4u8, 4u8)).unwrap();

            assert_ne!(result.reward, FAIL_REWARD);
            assert!(!result.info.map.contains_mine((4, 4)));
            assert_eq!(result.info.map.mine_count(), 10);
        }
    }

    #[test]
    fn eager_mode_generates_on_reset() {
        let config = GameConfig::new(4, 4, 3, false).unwrap().with_seed(9);
        let env = EpisodeController::new(config).unwrap();

        assert!(matches!(env.phase(), EpisodePhase::InProgress(_)));
        assert_eq!(env.minefield().map(|f| f.layout().mine_count()), Some(3));
    }

    #[test]
    fn reset_starts_a_fresh_episode() {
        let mut env = preset((2, 2), &[(0, 0)], true);
        env.step((1u8, 1u8)).unwrap();
        assert_eq!(env.steps_used(), 1);

        let observation = env.reset().unwrap();

        assert_eq!(observation, Array2::from_elem([2, 2], UNOPENED));
        assert_eq!(env.steps_used(), 0);
        assert_eq!(env.phase(), &EpisodePhase::AwaitingFirstMove);
    }

    #[test]
    fn reward_counts_newly_opened_cells() {
        // left column empties into the middle, right column sits behind a mine wall
        let mut env = preset((3, 4), &[(0, 2), (1, 2), (2, 2)], false);

        let result = env.step((1u8, 0u8)).unwrap();

        assert_eq!((result.reward, result.terminal), (6, false));
        assert_eq!(env.state().count_opened(), 6);
    }

    #[test]
    fn constructor_rejects_invalid_configuration() {
        let config = GameConfig::new_unchecked(3, 3, 9, false);

        assert_eq!(
            EpisodeController::new(config).err(),
            Some(GameError::InvalidConfiguration(ConfigProblem::TooManyMines))
        );
    }

    #[test]
    fn info_json_mirrors_layout() {
        let mut env = preset((2, 2), &[(1, 0)], false);
        let result = env.step((0u8, 1u8)).unwrap();

        assert_eq!(
            result.info.to_json(),
            serde_json::json!({ "map": [[0, 0], [1, 0]] })
        );
    }

    #[test]
    fn render_hook_sees_current_grid() {
        let mut env = preset((2, 2), &[(1, 0)], false);
        env.step((0u8, 1u8)).unwrap();

        let mut renderer = TextRenderer::new();
        env.render(&mut renderer);

        assert_eq!(renderer.frame(), "#1\n##\n");
    }
}
