//! Contains available options to configure the [Strategy][crate::Strategy].

/// The generation assigned to newly created objects.
pub const DEFAULT_INITIAL_GENERATION: i64 = 1;

/// Specifies available strategy options.
///
/// The [`Default`] implementation for this struct contains the following
/// values:
///
/// - Newly created objects start at generation [`DEFAULT_INITIAL_GENERATION`].
///
/// Additionally, this struct can be used as CLI arguments of a host binary.
/// This functionality is only available if the feature `clap` is enabled.
///
/// ### Example
///
/// ```
/// use deployconfig_registry::StrategyOptions;
///
/// let options = StrategyOptions::builder()
///     .initial_generation(0)
///     .build();
///
/// assert_eq!(options.initial_generation, 0);
/// ```
#[cfg_attr(feature = "clap", derive(clap::Args))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrategyOptions {
    /// The generation assigned to newly created DeploymentConfigs.
    #[cfg_attr(
        feature = "clap",
        arg(long, env, default_value_t = DEFAULT_INITIAL_GENERATION)
    )]
    pub initial_generation: i64,
}

impl Default for StrategyOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl StrategyOptions {
    /// Returns the default [`StrategyOptionsBuilder`] which allows to
    /// selectively customize the options.
    pub fn builder() -> StrategyOptionsBuilder {
        StrategyOptionsBuilder::default()
    }
}

/// The [`StrategyOptionsBuilder`] which allows to selectively customize the
/// [`StrategyOptions`].
#[derive(Debug, Default)]
pub struct StrategyOptionsBuilder {
    initial_generation: Option<i64>,
}

impl StrategyOptionsBuilder {
    /// Sets the generation newly created objects start with.
    pub fn initial_generation(mut self, initial_generation: i64) -> Self {
        self.initial_generation = Some(initial_generation);
        self
    }

    /// Builds the final [`StrategyOptions`] by using default values for any
    /// not explicitly set option.
    pub fn build(self) -> StrategyOptions {
        StrategyOptions {
            initial_generation: self
                .initial_generation
                .unwrap_or(DEFAULT_INITIAL_GENERATION),
        }
    }
}
