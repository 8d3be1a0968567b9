use std::path::Path;

pub fn run(config_path: &Path, port: Option<u16>, no_open: bool) -> anyhow::Result<()> {
    let config = super::load_config(config_path, None)?;
    let port = port.unwrap_or(config.server.port);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        let url = format!("http://localhost:{}", listener.local_addr()?.port());
        println!("dfg selection page → {url}");

        tokio::select! {
            res = dfg_server::serve_on(config, listener, !no_open) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        }
    })
}
