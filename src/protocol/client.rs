use crate::{
    core::{
        constants::{END_OF_ROUTE, QUIT_LINE},
        geo::LatLng,
    },
    layers::annotations::DotPair,
    protocol::channel::LineChannel,
    MapError, Result,
};
use std::fmt;

/// Where the client is in the request/response cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    Idle,
    AwaitingResponse,
}

/// A recoverable problem in a response. Reported to the user; the exchange
/// keeps reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolNotice {
    /// Wrong token count or a token that is not a finite number
    MalformedLine { line: String },
    /// The sentinel arrived after exactly one waypoint
    NotEnoughWaypoints,
}

impl fmt::Display for ProtocolNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolNotice::MalformedLine { .. } => f.write_str("Wrong format or invalid position."),
            ProtocolNotice::NotEnoughWaypoints => {
                f.write_str("No enough waypoints. Please start over")
            }
        }
    }
}

/// One parsed response line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResponseLine {
    Waypoint(LatLng),
    EndOfRoute,
}

impl ResponseLine {
    /// Splits on single spaces: `"E"` alone is the sentinel, anything else
    /// must be exactly two numbers.
    pub fn parse(line: &str) -> std::result::Result<Self, ProtocolNotice> {
        let tokens: Vec<&str> = line.split(' ').collect();
        if tokens == [END_OF_ROUTE] {
            return Ok(ResponseLine::EndOfRoute);
        }

        let malformed = || ProtocolNotice::MalformedLine {
            line: line.to_string(),
        };
        let &[lat, lng] = tokens.as_slice() else {
            return Err(malformed());
        };
        let parse = |token: &str| {
            token
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(malformed)
        };
        Ok(ResponseLine::Waypoint(LatLng::new(parse(lat)?, parse(lng)?)))
    }
}

/// Outcome of one exchange
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteResponse {
    /// Either empty or at least two waypoints
    pub waypoints: Vec<LatLng>,
    /// Every notice reported while reading, in order
    pub notices: Vec<ProtocolNotice>,
}

/// Sends dot pairs to the route service and reads back waypoints.
///
/// An exchange blocks until the service sends the sentinel; there is no
/// timeout and no cancellation. The caller's frame loop stalls meanwhile.
pub struct ProtocolClient<C> {
    channel: C,
    state: ExchangeState,
    exchanges: u64,
}

impl<C: LineChannel> ProtocolClient<C> {
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            state: ExchangeState::Idle,
            exchanges: 0,
        }
    }

    pub fn state(&self) -> ExchangeState {
        self.state
    }

    /// Number of completed exchanges
    pub fn exchanges(&self) -> u64 {
        self.exchanges
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn into_inner(self) -> C {
        self.channel
    }

    /// Runs one request/response exchange for `pair`.
    pub fn request_route(&mut self, pair: &DotPair) -> Result<RouteResponse> {
        self.state = ExchangeState::AwaitingResponse;
        log::info!("requesting route {} -> {}", pair.start, pair.end);

        let result = self.send_request(pair).and_then(|_| self.read_response());
        self.state = ExchangeState::Idle;

        let response = result?;
        self.exchanges += 1;
        log::info!(
            "route response complete: {} waypoints, {} notices",
            response.waypoints.len(),
            response.notices.len()
        );
        Ok(response)
    }

    /// Tells the service the plotter is going away.
    pub fn shutdown(&mut self) -> Result<()> {
        log::info!("closing route service session");
        self.channel.send_line(QUIT_LINE)
    }

    fn send_request(&mut self, pair: &DotPair) -> Result<()> {
        for line in pair.request_lines() {
            self.channel.send_line(&line)?;
        }
        Ok(())
    }

    fn read_response(&mut self) -> Result<RouteResponse> {
        let mut response = RouteResponse::default();
        loop {
            let line = self.channel.read_line()?.ok_or(MapError::ChannelClosed)?;
            match ResponseLine::parse(&line) {
                Ok(ResponseLine::EndOfRoute) if response.waypoints.len() == 1 => {
                    response.waypoints.clear();
                    self.report(&mut response, ProtocolNotice::NotEnoughWaypoints)?;
                }
                Ok(ResponseLine::EndOfRoute) => return Ok(response),
                Ok(ResponseLine::Waypoint(waypoint)) => response.waypoints.push(waypoint),
                Err(notice) => self.report(&mut response, notice)?,
            }
        }
    }

    fn report(&mut self, response: &mut RouteResponse, notice: ProtocolNotice) -> Result<()> {
        self.channel.notify(&notice.to_string())?;
        response.notices.push(notice);
        Ok(())
    }
}
