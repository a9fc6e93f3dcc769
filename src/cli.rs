use argh::FromArgs;

/// Replay recorded tracker output and attribute possession
#[derive(FromArgs, Debug)]
pub struct Args {
    /// team and match configuration (JSON)
    #[argh(option)]
    pub teams: String,

    /// recorded frames, one JSON object per line
    #[argh(option)]
    pub frames: String,

    /// team color filters (JSON); built-in kits when omitted
    #[argh(option)]
    pub filters: Option<String>,

    /// pipeline settings (JSON); defaults when omitted
    #[argh(option)]
    pub settings: Option<String>,

    /// frames per second of the source video
    #[argh(option, default = "25")]
    pub fps: u32,

    /// run without a progress bar
    #[argh(switch)]
    pub headless: bool,
}
