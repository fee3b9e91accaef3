/// One joystick/fire combination from the universal action vocabulary.
///
/// Every title filters this same set through
/// [`Title::is_minimal`](crate::core::title::Title::is_minimal). The
/// discriminants follow the conventional ordering used by RL harnesses
/// for this console, so an agent's integer action id maps directly via
/// [`Action::from_index`].
///
/// The set describes one player's controller. Player B and later players
/// use the same vocabulary; minimal sets are defined against player A.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Noop = 0,
    Fire = 1,
    Up = 2,
    Right = 3,
    Left = 4,
    Down = 5,
    UpRight = 6,
    UpLeft = 7,
    DownRight = 8,
    DownLeft = 9,
    UpFire = 10,
    RightFire = 11,
    LeftFire = 12,
    DownFire = 13,
    UpRightFire = 14,
    UpLeftFire = 15,
    DownRightFire = 16,
    DownLeftFire = 17,
}

impl Action {
    /// All actions in index order.
    pub const ALL: [Action; 18] = [
        Action::Noop,
        Action::Fire,
        Action::Up,
        Action::Right,
        Action::Left,
        Action::Down,
        Action::UpRight,
        Action::UpLeft,
        Action::DownRight,
        Action::DownLeft,
        Action::UpFire,
        Action::RightFire,
        Action::LeftFire,
        Action::DownFire,
        Action::UpRightFire,
        Action::UpLeftFire,
        Action::DownRightFire,
        Action::DownLeftFire,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Action> {
        Self::ALL.get(index).copied()
    }

    /// Human-readable name (e.g., "UPRIGHTFIRE").
    pub fn name(self) -> &'static str {
        match self {
            Action::Noop => "NOOP",
            Action::Fire => "FIRE",
            Action::Up => "UP",
            Action::Right => "RIGHT",
            Action::Left => "LEFT",
            Action::Down => "DOWN",
            Action::UpRight => "UPRIGHT",
            Action::UpLeft => "UPLEFT",
            Action::DownRight => "DOWNRIGHT",
            Action::DownLeft => "DOWNLEFT",
            Action::UpFire => "UPFIRE",
            Action::RightFire => "RIGHTFIRE",
            Action::LeftFire => "LEFTFIRE",
            Action::DownFire => "DOWNFIRE",
            Action::UpRightFire => "UPRIGHTFIRE",
            Action::UpLeftFire => "UPLEFTFIRE",
            Action::DownRightFire => "DOWNRIGHTFIRE",
            Action::DownLeftFire => "DOWNLEFTFIRE",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
