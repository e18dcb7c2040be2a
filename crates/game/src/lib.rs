// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod error;
mod game;
mod leaderboard;
mod reader;
mod registry;
mod router;
mod state;
mod verification;

pub use error::*;
pub use game::*;
pub use leaderboard::*;
pub use reader::*;
pub use registry::*;
pub use router::*;
pub use state::*;
pub use verification::*;
