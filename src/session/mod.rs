use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::download::{DownloadResult, Downloader};
use crate::extractors::MediaExtractor;
use crate::options::{DownloadRequest, MediaKind, NetworkProfile, QualityTier, DEFAULT_OUTPUT_DIR};
use crate::output;

/// Answers to the subtitle prompt that mean "yes"
const AFFIRMATIVE: &[&str] = &["y", "yes"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingInput,
    Processing,
    Terminal,
}

/// Fixed settings for every request a session builds
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub kind: MediaKind,
    pub output_dir: PathBuf,

    /// Ask the subtitle question before each video download
    pub ask_subtitles: bool,

    pub subtitle_languages: Vec<String>,
    pub network: NetworkProfile,
}

impl SessionSettings {
    pub fn new(kind: MediaKind) -> Self {
        Self {
            kind,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            ask_subtitles: kind == MediaKind::Video,
            subtitle_languages: Vec::new(),
            network: NetworkProfile::default(),
        }
    }
}

/// `q` in any letter case
pub fn is_exit(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case(output::EXIT_TOKEN)
}

/// Only an exact affirmative token counts as yes
pub fn parse_yes_no(input: &str) -> bool {
    let answer = input.trim().to_lowercase();
    AFFIRMATIVE.contains(&answer.as_str())
}

/// Interactive prompt loop for one tool
pub struct Session<E, R, W> {
    downloader: Downloader<E>,
    settings: SessionSettings,
    input: R,
    output: W,
    state: SessionState,
}

impl<E, R, W> Session<E, R, W>
where
    E: MediaExtractor,
    R: BufRead,
    W: Write,
{
    pub fn new(downloader: Downloader<E>, settings: SessionSettings, input: R, output: W) -> Self {
        Self {
            downloader,
            settings,
            input,
            output,
            state: SessionState::AwaitingInput,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Prompt for URLs until the user quits or input ends
    pub async fn run(&mut self) -> Result<()> {
        output::print_banner(&mut self.output, self.settings.kind)?;

        while self.state != SessionState::Terminal {
            self.step().await?;
        }
        Ok(())
    }

    /// One pass through the URL prompt
    pub async fn step(&mut self) -> Result<SessionState> {
        writeln!(self.output)?;
        output::prompt(&mut self.output, output::URL_PROMPT)?;

        let line = match self.read_line()? {
            Some(line) => line,
            None => {
                writeln!(self.output)?;
                return self.finish();
            }
        };

        if is_exit(&line) {
            return self.finish();
        }

        if line.is_empty() {
            writeln!(self.output, "{}", output::EMPTY_URL_REMINDER)?;
            return Ok(self.state);
        }

        let request = self.build_request(&line)?;

        self.state = SessionState::Processing;
        output::report_start(&mut self.output, &request)?;
        let result = self.downloader.download(&request).await;
        self.report(&result)?;
        self.state = SessionState::AwaitingInput;

        Ok(self.state)
    }

    fn finish(&mut self) -> Result<SessionState> {
        writeln!(self.output, "{}", output::GOODBYE)?;
        self.state = SessionState::Terminal;
        Ok(self.state)
    }

    fn report(&mut self, result: &DownloadResult) -> Result<()> {
        writeln!(self.output)?;
        output::report_result(&mut self.output, result)
    }

    fn build_request(&mut self, url: &str) -> Result<DownloadRequest> {
        let request = match self.settings.kind {
            MediaKind::Audio => DownloadRequest::audio(url),
            MediaKind::Video => {
                let quality = self.prompt_quality()?;
                let subtitles = if self.settings.ask_subtitles {
                    self.prompt_subtitles()?
                } else {
                    false
                };
                DownloadRequest::video(url, quality).with_subtitles(subtitles)
            }
        };

        Ok(request
            .with_output_dir(self.settings.output_dir.clone())
            .with_subtitle_languages(self.settings.subtitle_languages.clone())
            .with_network(self.settings.network.clone()))
    }

    fn prompt_quality(&mut self) -> Result<QualityTier> {
        output::print_quality_menu(&mut self.output)?;
        output::prompt(&mut self.output, output::QUALITY_PROMPT)?;
        let choice = self.read_line()?.unwrap_or_default();
        Ok(QualityTier::from_menu_choice(&choice))
    }

    fn prompt_subtitles(&mut self) -> Result<bool> {
        output::prompt(&mut self.output, output::SUBTITLE_PROMPT)?;
        let answer = self.read_line()?.unwrap_or_default();
        Ok(parse_yes_no(&answer))
    }

    /// Next trimmed line, `None` at end of input
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::{Extraction, MockMediaExtractor};
    use crate::TubegrabError;
    use mockall::predicate::function;
    use std::io::Cursor;

    fn session(
        mock: MockMediaExtractor,
        settings: SessionSettings,
        input: &str,
    ) -> Session<MockMediaExtractor, Cursor<Vec<u8>>, Vec<u8>> {
        Session::new(
            Downloader::new(mock),
            settings,
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
        )
    }

    fn settings(kind: MediaKind) -> (tempfile::TempDir, SessionSettings) {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = SessionSettings::new(kind);
        settings.output_dir = dir.path().to_path_buf();
        (dir, settings)
    }

    fn idle_mock() -> MockMediaExtractor {
        let mut mock = MockMediaExtractor::new();
        mock.expect_name().return_const("mock");
        mock.expect_extract().times(0);
        mock
    }

    fn run(mut session: Session<MockMediaExtractor, Cursor<Vec<u8>>, Vec<u8>>) -> (SessionState, String) {
        tokio_test::block_on(session.run()).unwrap();
        let state = session.state();
        (state, String::from_utf8(session.into_output()).unwrap())
    }

    #[test]
    fn test_is_exit() {
        assert!(is_exit("q"));
        assert!(is_exit("Q"));
        assert!(is_exit(" q "));
        assert!(!is_exit("quit"));
        assert!(!is_exit(""));
    }

    #[test]
    fn test_parse_yes_no() {
        for answer in ["y", "Y", "yes", "YES", " Yes "] {
            assert!(parse_yes_no(answer), "{:?}", answer);
        }
        for answer in ["", "n", "no", "yeah", "sure", "1", "ye"] {
            assert!(!parse_yes_no(answer), "{:?}", answer);
        }
    }

    #[tokio::test]
    async fn test_empty_input_keeps_waiting() {
        let (_dir, settings) = settings(MediaKind::Audio);
        let mut session = session(idle_mock(), settings, "\n");

        let state = session.step().await.unwrap();
        assert_eq!(state, SessionState::AwaitingInput);

        let text = String::from_utf8(session.into_output()).unwrap();
        assert!(text.contains(output::EMPTY_URL_REMINDER));
    }

    #[test]
    fn test_quit_in_any_case_stops_without_more_prompts() {
        for token in ["q", "Q"] {
            let (_dir, settings) = settings(MediaKind::Video);
            let (state, text) = run(session(idle_mock(), settings, &format!("{}\nhttps://youtu.be/abc\n", token)));

            assert_eq!(state, SessionState::Terminal);
            assert_eq!(text.matches(output::URL_PROMPT).count(), 1);
            assert!(!text.contains(output::QUALITY_PROMPT));
            assert!(text.trim_end().ends_with(output::GOODBYE));
        }
    }

    #[test]
    fn test_end_of_input_terminates() {
        let (_dir, settings) = settings(MediaKind::Audio);
        let (state, _) = run(session(idle_mock(), settings, ""));
        assert_eq!(state, SessionState::Terminal);
    }

    #[test]
    fn test_failed_download_keeps_looping() {
        let (_dir, settings) = settings(MediaKind::Audio);
        let mut mock = MockMediaExtractor::new();
        mock.expect_name().return_const("mock");
        mock.expect_extract().times(1).returning(|_| {
            Err(TubegrabError::ExtractionFailed("Unsupported URL: not-a-url".to_string()).into())
        });

        let (state, text) = run(session(mock, settings, "not-a-url\nq\n"));

        assert_eq!(state, SessionState::Terminal);
        assert!(text.contains("Error: Extraction failed: Unsupported URL: not-a-url"));
        assert!(text.contains(output::FAILURE_MARKER));
        assert_eq!(text.matches(output::URL_PROMPT).count(), 2);
    }

    #[test]
    fn test_audio_download_reports_mp3() {
        let (dir, settings) = settings(MediaKind::Audio);
        let reported = dir.path().join("Song.webm");

        let mut mock = MockMediaExtractor::new();
        mock.expect_name().return_const("mock");
        mock.expect_extract()
            .with(function(|config: &crate::options::ExtractorConfig| {
                config.format_selector == "bestaudio/best"
            }))
            .times(1)
            .returning(move |_| {
                Ok(Extraction {
                    filename: reported.clone(),
                    title: Some("Song".to_string()),
                })
            });

        let (_, text) = run(session(mock, settings, "https://youtu.be/abc\nq\n"));

        let expected = dir.path().join("Song.mp3");
        assert!(text.contains(&format!("{} {}", output::SUCCESS_MARKER, expected.display())));
    }

    #[test]
    fn test_video_prompts_select_quality_and_subtitles() {
        let (dir, settings) = settings(MediaKind::Video);
        fs_err::write(dir.path().join("Talk.ja.srt"), "1\n").unwrap();
        let reported = dir.path().join("Talk.mp4");

        let mut mock = MockMediaExtractor::new();
        mock.expect_name().return_const("mock");
        mock.expect_extract()
            .with(function(|config: &crate::options::ExtractorConfig| {
                config.format_selector == QualityTier::Medium.format_selector()
                    && config.subtitles.is_some()
            }))
            .times(1)
            .returning(move |_| {
                Ok(Extraction {
                    filename: reported.clone(),
                    title: None,
                })
            });

        let (_, text) = run(session(mock, settings, "https://youtu.be/abc\n3\nyes\nq\n"));

        assert!(text.contains("Quality: medium"));
        assert!(text.contains("Subtitles: ja, en"));
        assert!(text.contains(&format!("Subtitle: {}", dir.path().join("Talk.ja.srt").display())));
        assert!(!text.contains("Talk.en.srt"));
    }

    #[test]
    fn test_invalid_quality_choice_means_best() {
        let (dir, mut settings) = settings(MediaKind::Video);
        settings.ask_subtitles = false;
        let reported = dir.path().join("Clip.mp4");

        let mut mock = MockMediaExtractor::new();
        mock.expect_name().return_const("mock");
        mock.expect_extract()
            .with(function(|config: &crate::options::ExtractorConfig| {
                config.format_selector == QualityTier::Best.format_selector()
                    && config.subtitles.is_none()
            }))
            .times(1)
            .returning(move |_| {
                Ok(Extraction {
                    filename: reported.clone(),
                    title: None,
                })
            });

        let (_, text) = run(session(mock, settings, "https://youtu.be/abc\n9\nq\n"));

        assert!(text.contains("Quality: best"));
        assert!(!text.contains(output::SUBTITLE_PROMPT));
    }
}
