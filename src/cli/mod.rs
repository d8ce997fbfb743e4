use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive multi-turn chat on stdin
    Chat {
        /// Print the full prompt before each completion request
        #[arg(long)]
        show_prompt: bool,

        /// Print the rendered transcript when the session ends
        #[arg(long)]
        show_history: bool,
    },

    /// Send a single message and print the reply
    Ask {
        message: String,

        #[arg(long)]
        show_prompt: bool,
    },

    /// Render a transcript built from role:text turns, without calling a provider
    Render {
        /// A turn as role:text, e.g. --turn "user:Hi". Repeat in conversation order.
        #[arg(short, long)]
        turn: Vec<String>,
    },
}
