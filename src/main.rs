use anyhow::Result;

use benchdash::app::Dashboard;
use benchdash::logging::{json_log, log, obj, v_str, Domain, Level};
use benchdash::source::{http::HttpSource, local::LocalSource, DataSource};
use benchdash::state::{Config, Output};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    let source: Box<dyn DataSource> = match &cfg.base_url {
        Some(base) => {
            json_log(Domain::System, "source", obj(&[("http", v_str(base))]));
            Box::new(HttpSource::new(base)?)
        }
        None => {
            json_log(Domain::System, "source", obj(&[("dir", v_str(&cfg.data_dir))]));
            Box::new(LocalSource::new(cfg.data_dir.clone()))
        }
    };

    let mut dash = match Dashboard::bootstrap(source.as_ref()).await {
        Ok(dash) => dash,
        Err(err) => {
            log(
                Level::Error,
                Domain::Fetch,
                "manifest_fetch_failed",
                obj(&[("error", v_str(&format!("{:#}", err)))]),
            );
            return Ok(());
        }
    };

    if dash.catalog().is_empty() {
        log(Level::Warn, Domain::Catalog, "no_datasets", obj(&[]));
        return Ok(());
    }

    // Dataset and date default to: first dataset, latest date.
    let dataset = cfg
        .dataset
        .clone()
        .or_else(|| dash.catalog().first_dataset_id().map(|s| s.to_string()));
    let dataset = match dataset {
        Some(d) => d,
        None => return Ok(()),
    };
    if let Err(err) = dash.select_dataset(source.as_ref(), &dataset).await {
        log(
            Level::Error,
            Domain::Catalog,
            "dataset_select_failed",
            obj(&[
                ("dataset", v_str(&dataset)),
                ("error", v_str(&format!("{:#}", err))),
            ]),
        );
        return Ok(());
    }
    if let Some(date) = &cfg.date {
        dash.select_date(source.as_ref(), date).await?;
    }

    dash.set_metric(cfg.metric);
    dash.set_threading(cfg.threading);
    if cfg.test.is_some() {
        dash.set_test(cfg.test.clone());
    }
    if cfg.style.is_some() {
        dash.set_style(cfg.style.clone());
    }

    json_log(
        Domain::Render,
        "render",
        obj(&[
            ("dataset", v_str(&dataset)),
            ("date", v_str(dash.date().unwrap_or(""))),
            ("test", v_str(dash.selection().test.as_deref().unwrap_or(""))),
            ("style", v_str(dash.selection().style.as_deref().unwrap_or(""))),
            ("metric", v_str(dash.selection().metric.as_str())),
            ("threading", v_str(dash.selection().threading.as_str())),
        ]),
    );

    match cfg.output {
        Output::Json => println!("{}", serde_json::to_string_pretty(&dash.chart_json())?),
        Output::Ascii => print!("{}", dash.chart_text()),
    }

    Ok(())
}
