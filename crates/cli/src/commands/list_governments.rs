use super::{Context, ExitCode};

#[derive(clap::Args)]
pub struct Args {
    /// Filter governments whose name contains this text
    #[arg(short, long)]
    pub search: Option<String>,
}

pub async fn main(ctx: &Context, args: Args) -> anyhow::Result<ExitCode> {
    let api = ctx.api()?;
    let mut governments = api.governments().await?;

    if let Some(search) = args.search {
        let search = search.to_lowercase();
        governments.retain(|government| government.name.to_lowercase().contains(&search));
    }
    governments.sort_by_key(|government| government.id.0);

    println!("{:<5} | {}", "ID", "Name");
    for government in governments {
        println!("{:<5} | {}", government.id.0, government.name);
    }
    Ok(ExitCode::Ok)
}
