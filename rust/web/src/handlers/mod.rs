pub mod deck;
pub mod game;
pub mod health;
pub mod scoreboard;

pub use deck::{get_deck, DeckQuery};
pub use game::{
    create_table, delete_table, get_table, get_table_state, submit_action, CreateTableRequest,
    PlayerActionRequest, TableResponse,
};
pub use health::health;
pub use scoreboard::{delete_scoreboard, get_scoreboard, put_scoreboard};
