use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "assistant-hub")]
#[command(about = "Assistants, knowledge bases and chat history stored as plain files")]
pub struct ServerConfig {
    /// Directory that holds assistants, knowledge bases and history
    #[arg(long, env = "ASSISTANT_HUB_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Listen address
    #[arg(short, long, env = "ASSISTANT_HUB_ADDR", default_value = "0.0.0.0:8080")]
    pub addr: SocketAddr,
}
